/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod parse;
pub use parse::{HttpChunkedLine, HttpHeaderLine, HttpLineParseError, HttpStatusLine};

pub mod header;

mod body;
pub use body::{ChunkedDecoder, ContentEncoding, HttpBodyType, HttpChunkedDecodeError};

mod cookie;
pub use cookie::{Cookie, CookieStore};

mod request;
pub use request::{
    HttpContent, HttpRequest, HttpRequestSegments, HttpRequestSerializeError,
    HttpRequestSerializer,
};

mod response;
pub use response::{
    HttpHeaderScanner, HttpResponse, HttpResponseContent, HttpResponseParseError,
    HttpResponseParser,
};

pub mod connect;
