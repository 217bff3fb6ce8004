/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use http::HeaderName;
use http::header;

const CONTENT_HEADERS: &[HeaderName] = &[
    header::ALLOW,
    header::CONTENT_DISPOSITION,
    header::CONTENT_ENCODING,
    header::CONTENT_LANGUAGE,
    header::CONTENT_LENGTH,
    header::CONTENT_LOCATION,
    header::CONTENT_RANGE,
    header::CONTENT_TYPE,
    header::EXPIRES,
    header::LAST_MODIFIED,
    header::TRANSFER_ENCODING,
];

/// Headers that describe the body rather than the message
pub fn is_content_header(name: &HeaderName) -> bool {
    CONTENT_HEADERS.contains(name) || name.as_str() == "content-md5"
}

pub fn content_length(len: u64) -> String {
    let mut b = itoa::Buffer::new();
    format!("Content-Length: {}\r\n", b.format(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert!(is_content_header(&header::CONTENT_TYPE));
        assert!(is_content_header(&header::TRANSFER_ENCODING));
        assert!(is_content_header(&HeaderName::from_static("content-md5")));
        assert!(!is_content_header(&header::SET_COOKIE));
        assert!(!is_content_header(&header::LOCATION));
    }

    #[test]
    fn length_line() {
        assert_eq!(content_length(42), "Content-Length: 42\r\n");
    }
}
