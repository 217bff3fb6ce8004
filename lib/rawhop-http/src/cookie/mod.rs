/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod set_cookie;

mod store;
pub use store::{Cookie, CookieStore};
