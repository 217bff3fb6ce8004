/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix16Checked;

use super::HttpLineParseError;

pub struct HttpChunkedLine<'a> {
    pub chunk_size: u64,
    pub extension: Option<&'a str>,
}

impl<'a> HttpChunkedLine<'a> {
    /// Parse a chunk size line, with or without the line terminator
    pub fn parse(buf: &'a [u8]) -> Result<HttpChunkedLine<'a>, HttpLineParseError> {
        let (chunk_size, offset) = u64::from_radix_16_checked(buf);
        if offset == 0 {
            return Err(HttpLineParseError::InvalidChunkSize);
        }
        let Some(chunk_size) = chunk_size else {
            return Err(HttpLineParseError::InvalidChunkSize);
        };

        let Some(c) = buf.get(offset) else {
            return Ok(HttpChunkedLine {
                chunk_size,
                extension: None,
            });
        };
        match c {
            b'\r' | b'\n' | b' ' | b'\t' => {
                let left = std::str::from_utf8(&buf[offset..])?.trim();
                match left.strip_prefix(';') {
                    Some(ext) => Ok(HttpChunkedLine {
                        chunk_size,
                        extension: Some(ext.trim()),
                    }),
                    None if left.is_empty() => Ok(HttpChunkedLine {
                        chunk_size,
                        extension: None,
                    }),
                    None => Err(HttpLineParseError::InvalidChunkSize),
                }
            }
            b';' => {
                let extension = std::str::from_utf8(&buf[offset + 1..])?.trim();
                Ok(HttpChunkedLine {
                    chunk_size,
                    extension: Some(extension),
                })
            }
            _ => Err(HttpLineParseError::InvalidChunkSize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple() {
        let chunk = HttpChunkedLine::parse(b"1\r\n").unwrap();
        assert_eq!(chunk.chunk_size, 1);

        let chunk = HttpChunkedLine::parse(b"1F").unwrap();
        assert_eq!(chunk.chunk_size, 0x1f);
        assert!(chunk.extension.is_none());
    }

    #[test]
    fn with_extension() {
        let chunk = HttpChunkedLine::parse(b"1; ieof\r\n").unwrap();
        assert_eq!(chunk.chunk_size, 1);
        assert_eq!(chunk.extension, Some("ieof"));

        let chunk = HttpChunkedLine::parse(b"a ;name=value").unwrap();
        assert_eq!(chunk.chunk_size, 10);
        assert_eq!(chunk.extension, Some("name=value"));
    }

    #[test]
    fn invalid() {
        assert!(HttpChunkedLine::parse(b"\r\n").is_err());
        assert!(HttpChunkedLine::parse(b"zz\r\n").is_err());
        assert!(HttpChunkedLine::parse(b"1x\r\n").is_err());
        assert!(HttpChunkedLine::parse(b"1 x\r\n").is_err());
        assert!(HttpChunkedLine::parse(b"fffffffffffffffff\r\n").is_err());
    }
}
