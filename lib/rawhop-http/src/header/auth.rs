/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use base64::prelude::*;

use rawhop_types::auth::{Password, Username};

pub fn proxy_authorization_basic(username: &Username, password: &Password) -> String {
    let credentials = format!("{}:{}", username.as_original(), password.as_original());
    format!(
        "Proxy-Authorization: Basic {}\r\n",
        BASE64_STANDARD.encode(credentials)
    )
}
