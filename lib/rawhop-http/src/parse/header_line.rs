/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;

use super::HttpLineParseError;

pub struct HttpHeaderLine<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

impl<'a> HttpHeaderLine<'a> {
    /// Split a header line at the first colon.
    ///
    /// Only a single space after the colon is dropped from the value, the
    /// line terminator is stripped if present.
    pub fn parse(buf: &'a [u8]) -> Result<HttpHeaderLine<'a>, HttpLineParseError> {
        let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
        let buf = buf.strip_suffix(b"\r").unwrap_or(buf);

        let Some(p) = memchr::memchr(b':', buf) else {
            return Err(HttpLineParseError::NoDelimiterFound(':'));
        };

        let name = std::str::from_utf8(&buf[0..p])?.trim();
        if name.is_empty() {
            return Err(HttpLineParseError::InvalidHeaderName);
        }
        let value = &buf[p + 1..];
        let value = value.strip_prefix(b" ").unwrap_or(value);

        Ok(HttpHeaderLine {
            name,
            value: String::from_utf8_lossy(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_space_trimmed() {
        let h = HttpHeaderLine::parse(b"Content-Type: text/html\r\n").unwrap();
        assert_eq!(h.name, "Content-Type");
        assert_eq!(h.value, "text/html");

        let h = HttpHeaderLine::parse(b"X-Pad:   a b ").unwrap();
        assert_eq!(h.name, "X-Pad");
        assert_eq!(h.value, "  a b ");

        let h = HttpHeaderLine::parse(b"X-Empty:\n").unwrap();
        assert_eq!(h.value, "");
    }

    #[test]
    fn split_at_first_colon() {
        let h = HttpHeaderLine::parse(b"Location: http://a.test:8080/x\r\n").unwrap();
        assert_eq!(h.name, "Location");
        assert_eq!(h.value, "http://a.test:8080/x");
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            HttpHeaderLine::parse(b"no colon here\r\n"),
            Err(HttpLineParseError::NoDelimiterFound(':'))
        ));
        assert!(matches!(
            HttpHeaderLine::parse(b": value\r\n"),
            Err(HttpLineParseError::InvalidHeaderName)
        ));
        assert!(HttpHeaderLine::parse(b"Na\xFFme: v\r\n").is_err());
    }

    #[test]
    fn lossy_value() {
        let h = HttpHeaderLine::parse(b"X-Latin: caf\xE9\r\n").unwrap();
        assert_eq!(h.value, "caf\u{FFFD}");
    }
}
