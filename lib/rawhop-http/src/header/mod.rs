/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod auth;
pub use auth::proxy_authorization_basic;

mod content;
pub use content::{content_length, is_content_header};
