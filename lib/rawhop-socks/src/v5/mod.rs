/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use crate::types::*;

mod auth;
mod reply;
mod request;

use reply::Socks5Reply;
use request::Socks5Request;

mod client;
pub use client::socks5_connect_to;
