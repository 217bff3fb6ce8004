/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpRequestSerializeError {
    #[error("unsupported http version {0}")]
    UnsupportedVersion(String),
    #[error("no host found in uri")]
    NoHostFound,
    #[error("invalid header name {0}")]
    InvalidHeaderName(String),
    #[error("invalid value for header {0}")]
    InvalidHeaderValue(String),
}
