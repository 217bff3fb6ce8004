/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix10Checked;
use http::Version;

use super::HttpLineParseError;

pub struct HttpStatusLine<'a> {
    pub version: Version,
    pub code: u16,
    pub reason: &'a str,
}

impl<'a> HttpStatusLine<'a> {
    /// Parse a status line, with or without the line terminator
    pub fn parse(buf: &'a [u8]) -> Result<HttpStatusLine<'a>, HttpLineParseError> {
        const MINIMAL_LENGTH: usize = 12; // HTTP/1.x XYZ

        let Some(p) = memchr::memchr(b' ', buf) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let version = match &buf[0..p] {
            b"HTTP/1.0" => Version::HTTP_10,
            b"HTTP/1.1" => Version::HTTP_11,
            b"HTTP/2.0" | b"HTTP/2" | b"HTTP/3.0" | b"HTTP/3" => {
                return Err(HttpLineParseError::UnsupportedVersion);
            }
            _ => return Err(HttpLineParseError::InvalidVersion),
        };

        if buf.len() < MINIMAL_LENGTH {
            return Err(HttpLineParseError::NotLongEnough);
        }

        let left = &buf[p + 1..];
        let (code, len) = u16::from_radix_10_checked(left);
        let Some(code) = code else {
            return Err(HttpLineParseError::InvalidStatusCode);
        };
        if len != 3 {
            return Err(HttpLineParseError::InvalidStatusCode);
        }

        let reason = match left.get(len) {
            None => "",
            Some(b' ') => std::str::from_utf8(&left[len + 1..])?.trim(),
            Some(b'\r' | b'\n') => "",
            Some(_) => return Err(HttpLineParseError::InvalidStatusCode),
        };

        Ok(HttpStatusLine {
            version,
            code,
            reason,
        })
    }
}
