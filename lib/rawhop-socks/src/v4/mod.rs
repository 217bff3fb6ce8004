/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use crate::types::*;

mod reply;
mod request;

use reply::SocksV4Reply;
use request::SocksV4Request;

mod client;
pub use client::socks4_connect_to;
