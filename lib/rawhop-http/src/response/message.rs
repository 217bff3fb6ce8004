/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;

use bytes::Bytes;
use http::{StatusCode, Version, header};

use rawhop_types::net::HttpHeaderMap;

use crate::HttpRequest;

/// Response body together with the headers describing it
#[derive(Debug, Clone, Default)]
pub struct HttpResponseContent {
    pub headers: HttpHeaderMap,
    pub body: Bytes,
}

impl HttpResponseContent {
    /// Body decoded as utf-8, invalid sequences replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub version: Version,
    pub code: u16,
    pub reason: String,
    pub headers: HttpHeaderMap,
    pub content: HttpResponseContent,
    /// the request sent for this response, as of the last hop
    pub request: HttpRequest,
}

impl HttpResponse {
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.code).ok()
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.code, 301 | 302 | 303 | 307 | 308)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get_first(&header::LOCATION)
    }
}
