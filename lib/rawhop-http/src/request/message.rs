/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use http::header::InvalidHeaderName;
use http::{Method, Version};
use url::Url;

use rawhop_types::net::HttpHeaderMap;

use super::HttpContent;
use crate::CookieStore;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: Url,
    pub version: Version,
    pub headers: HttpHeaderMap,
    pub content: Option<HttpContent>,
    pub cookies: CookieStore,
}

impl HttpRequest {
    pub fn new(method: Method, uri: Url) -> Self {
        HttpRequest {
            method,
            uri,
            version: Version::HTTP_11,
            headers: HttpHeaderMap::default(),
            content: None,
            cookies: CookieStore::default(),
        }
    }

    /// Share a cookie jar with other requests
    pub fn with_cookie_store(mut self, cookies: CookieStore) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_content(mut self, content: HttpContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn append_header(&mut self, name: &str, value: &str) -> Result<(), InvalidHeaderName> {
        self.headers.append_str(name, value)
    }

    #[inline]
    pub fn is_https(&self) -> bool {
        self.uri.scheme().eq_ignore_ascii_case("https")
    }
}
