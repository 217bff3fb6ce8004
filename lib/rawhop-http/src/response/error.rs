/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use crate::HttpChunkedDecodeError;

#[derive(Debug, Error)]
pub enum HttpResponseParseError {
    #[error("invalid status line: {0}")]
    InvalidStatusLine(String),
    #[error("unsupported http version in status line: {0}")]
    UnsupportedVersion(String),
    #[error("too large header, should be less than {0}")]
    TooLargeHeader(usize),
    #[error("connection closed while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("invalid chunked body: {0}")]
    InvalidChunkedBody(#[from] HttpChunkedDecodeError),
    #[error("unsupported content encoding {0}")]
    UnsupportedContentEncoding(String),
    #[error("failed to decode {0} content: {1}")]
    DecodeFailed(&'static str, io::Error),
    #[error("read failed: {0:?}")]
    ReadFailed(#[from] io::Error),
}
