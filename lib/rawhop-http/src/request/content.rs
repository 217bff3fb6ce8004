/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bytes::Bytes;
use http::header::InvalidHeaderName;

use rawhop_types::net::HttpHeaderMap;

/// Request body together with the headers describing it
#[derive(Debug, Clone, Default)]
pub struct HttpContent {
    pub headers: HttpHeaderMap,
    pub body: Bytes,
}

impl HttpContent {
    pub fn new<B: Into<Bytes>>(body: B) -> Self {
        HttpContent {
            headers: HttpHeaderMap::default(),
            body: body.into(),
        }
    }

    pub fn with_type<B: Into<Bytes>>(body: B, content_type: &str) -> Self {
        let mut content = HttpContent::new(body);
        // content-type is a valid header name
        let _ = content.headers.insert_str("Content-Type", content_type);
        content
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), InvalidHeaderName> {
        self.headers.insert_str(name, value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
