/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::HttpResponseParseError;

mod scanner;
pub use scanner::HttpHeaderScanner;

mod message;
pub use message::{HttpResponse, HttpResponseContent};

mod parser;
pub use parser::HttpResponseParser;
