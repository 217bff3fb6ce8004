/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod fs;
mod net;
mod primary;

pub use fs::as_file_path;
pub use net::*;
pub use primary::{as_bool, as_list, as_string, as_u32, as_usize};
