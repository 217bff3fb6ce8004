/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderName, Version, header};

use rawhop_types::net::{HttpHeaderEntry, HttpHeaderMap};

use super::{HttpRequest, HttpRequestSerializeError};

/// The wire form of a request, written in order on one connection
#[derive(Debug, Clone)]
pub struct HttpRequestSegments {
    pub request_line: Bytes,
    pub headers: Bytes,
    /// empty if the request has no body
    pub body: Bytes,
}

impl HttpRequestSegments {
    pub fn iter(&self) -> impl Iterator<Item = &Bytes> {
        [&self.request_line, &self.headers, &self.body].into_iter()
    }

    pub fn into_vec(self) -> Vec<Bytes> {
        vec![self.request_line, self.headers, self.body]
    }
}

pub struct HttpRequestSerializer<'a> {
    req: &'a HttpRequest,
}

impl<'a> HttpRequestSerializer<'a> {
    pub fn new(req: &'a HttpRequest) -> Self {
        HttpRequestSerializer { req }
    }

    pub fn serialize(&self) -> Result<HttpRequestSegments, HttpRequestSerializeError> {
        let request_line = self.request_line()?;
        let headers = self.header_block()?;
        let body = self
            .req
            .content
            .as_ref()
            .map(|c| c.body.clone())
            .unwrap_or_default();
        Ok(HttpRequestSegments {
            request_line,
            headers,
            body,
        })
    }

    fn request_line(&self) -> Result<Bytes, HttpRequestSerializeError> {
        let version = match self.req.version {
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            v => return Err(HttpRequestSerializeError::UnsupportedVersion(format!("{v:?}"))),
        };

        let uri = &self.req.uri;
        let mut buf = BytesMut::with_capacity(64 + uri.as_str().len());
        buf.put_slice(self.req.method.as_str().as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(uri.path().as_bytes());
        if let Some(query) = uri.query() {
            buf.put_u8(b'?');
            buf.put_slice(query.as_bytes());
        }
        buf.put_u8(b' ');
        buf.put_slice(version.as_bytes());
        buf.put_slice(b"\r\n");
        Ok(buf.freeze())
    }

    fn host_value(&self) -> Result<String, HttpRequestSerializeError> {
        let uri = &self.req.uri;
        let host = uri
            .host_str()
            .ok_or(HttpRequestSerializeError::NoHostFound)?;
        // url omits the port if it is the scheme default
        match uri.port() {
            Some(port) => Ok(format!("{host}:{port}")),
            None => Ok(host.to_string()),
        }
    }

    fn header_block(&self) -> Result<Bytes, HttpRequestSerializeError> {
        let headers = &self.req.headers;
        let mut buf = BytesMut::with_capacity(1024);

        if !has_value(headers, &header::HOST) {
            put_header_line(&mut buf, "Host", &self.host_value()?);
        }
        if !has_value(headers, &header::CONNECTION) {
            buf.put_slice(b"Connection: Close\r\n");
        }

        let stored_cookies = self.req.cookies.cookie_header(&self.req.uri);
        let mut cookie_values: Vec<&str> = Vec::new();
        for (name, entry) in headers.iter() {
            if *name == header::COOKIE {
                cookie_values.extend(
                    entry
                        .values()
                        .iter()
                        .filter(|v| !v.is_empty())
                        .map(|v| v.as_str()),
                );
                continue;
            }
            put_header_entry(&mut buf, name, entry)?;
        }

        if let Some(s) = &stored_cookies {
            cookie_values.push(s);
        }
        if !cookie_values.is_empty() {
            let value = cookie_values.join("; ");
            check_header_value("Cookie", &value)?;
            put_header_line(&mut buf, "Cookie", &value);
        }

        if let Some(content) = &self.req.content {
            for (name, entry) in content.headers.iter() {
                put_header_entry(&mut buf, name, entry)?;
            }
            if !content.is_empty() && !has_value(&content.headers, &header::CONTENT_LENGTH) {
                buf.put_slice(crate::header::content_length(content.len() as u64).as_bytes());
            }
        }

        buf.put_slice(b"\r\n");
        Ok(buf.freeze())
    }
}

fn has_value(headers: &HttpHeaderMap, name: &HeaderName) -> bool {
    headers
        .get(name)
        .is_some_and(|e| e.values().iter().any(|v| !v.is_empty()))
}

fn check_header_value(name: &str, value: &str) -> Result<(), HttpRequestSerializeError> {
    if value.bytes().any(|b| b == b'\r' || b == b'\n') {
        Err(HttpRequestSerializeError::InvalidHeaderValue(
            name.to_string(),
        ))
    } else {
        Ok(())
    }
}

fn put_header_line(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put_slice(name.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
}

fn put_header_entry(
    buf: &mut BytesMut,
    name: &HeaderName,
    entry: &HttpHeaderEntry,
) -> Result<(), HttpRequestSerializeError> {
    let values: Vec<&str> = entry
        .values()
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| v.as_str())
        .collect();
    if values.is_empty() {
        return Ok(());
    }

    let original_name = entry.original_name();
    if HeaderName::from_bytes(original_name.as_bytes()).is_err() {
        return Err(HttpRequestSerializeError::InvalidHeaderName(
            original_name.to_string(),
        ));
    }

    let sep = if *name == header::ACCEPT || *name == header::ACCEPT_ENCODING {
        ", "
    } else {
        " "
    };
    let value = values.join(sep);
    check_header_value(original_name, &value)?;
    put_header_line(buf, original_name, &value);
    Ok(())
}
