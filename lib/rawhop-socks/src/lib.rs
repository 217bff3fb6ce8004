/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod types;
pub use types::{SocksAuthMethod, SocksConnectError, SocksNegotiationError, SocksReplyParseError};

pub mod v4;
pub mod v5;
