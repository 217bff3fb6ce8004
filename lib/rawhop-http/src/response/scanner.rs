/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use super::HttpResponseParseError;
use crate::HttpHeaderLine;

/// Incremental scanner for the header block of a message.
///
/// Lines found complete inside a fed slice are parsed in place, only a line
/// crossing the end of a slice is copied into the carry buffer.
pub struct HttpHeaderScanner {
    max_size: usize,
    scanned: usize,
    carry: Vec<u8>,
    headers: Vec<(String, String)>,
    finished: bool,
}

impl HttpHeaderScanner {
    pub fn new(max_size: usize) -> Self {
        HttpHeaderScanner {
            max_size,
            scanned: 0,
            carry: Vec::new(),
            headers: Vec::new(),
            finished: false,
        }
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Header lines scanned so far, in arrival order
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn into_headers(self) -> Vec<(String, String)> {
        self.headers
    }

    /// Feed the next slice of the stream.
    ///
    /// Return the used size once the empty line ending the block is met, or
    /// `None` if all of `buf` was used and more data is needed.
    pub fn feed(&mut self, buf: &[u8]) -> Result<Option<usize>, HttpResponseParseError> {
        if self.finished {
            return Ok(Some(0));
        }

        let mut offset = 0;
        if !self.carry.is_empty() {
            let Some(p) = memchr::memchr(b'\n', buf) else {
                self.count(buf.len())?;
                self.carry.extend_from_slice(buf);
                return Ok(None);
            };
            self.count(p + 1)?;
            self.carry.extend_from_slice(&buf[..=p]);
            offset = p + 1;
            let line = std::mem::take(&mut self.carry);
            if self.handle_line(&line) {
                return Ok(Some(offset));
            }
        }

        while let Some(p) = memchr::memchr(b'\n', &buf[offset..]) {
            self.count(p + 1)?;
            let line = &buf[offset..offset + p + 1];
            offset += p + 1;
            if self.handle_line(line) {
                return Ok(Some(offset));
            }
        }

        let left = &buf[offset..];
        self.count(left.len())?;
        self.carry.extend_from_slice(left);
        Ok(None)
    }

    fn count(&mut self, size: usize) -> Result<(), HttpResponseParseError> {
        self.scanned += size;
        if self.scanned > self.max_size {
            Err(HttpResponseParseError::TooLargeHeader(self.max_size))
        } else {
            Ok(())
        }
    }

    /// Return true if this is the end line
    fn handle_line(&mut self, line: &[u8]) -> bool {
        if matches!(line, b"\n" | b"\r\n") {
            self.finished = true;
            return true;
        }
        match HttpHeaderLine::parse(line) {
            Ok(header) => {
                log::trace!("header line: {}: {}", header.name, header.value);
                self.headers
                    .push((header.name.to_string(), header.value.into_owned()));
            }
            Err(e) => {
                log::trace!(
                    "ignore header line {}: {e}",
                    String::from_utf8_lossy(line).trim_end()
                );
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &[u8] = b"Content-Type: text/html\r\n\
        Set-Cookie: a=1\r\n\
        broken line\r\n\
        X-Empty:\r\n\
        X-Space:  two\r\n\
        Location: http://x.test:8080/\n\
        \r\nbody";

    fn expected() -> Vec<(String, String)> {
        [
            ("Content-Type", "text/html"),
            ("Set-Cookie", "a=1"),
            ("X-Empty", ""),
            ("X-Space", " two"),
            ("Location", "http://x.test:8080/"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn contiguous() {
        let mut scanner = HttpHeaderScanner::new(4096);
        let used = scanner.feed(BLOCK).unwrap().unwrap();
        assert_eq!(&BLOCK[used..], b"body");
        assert!(scanner.finished());
        assert_eq!(scanner.into_headers(), expected());
    }

    #[test]
    fn every_split_point() {
        let head_len = BLOCK.len() - 4;
        for i in 0..=head_len {
            let mut scanner = HttpHeaderScanner::new(4096);
            let (a, b) = BLOCK.split_at(i);
            let used = match scanner.feed(a).unwrap() {
                Some(used) => {
                    assert_eq!(i, head_len);
                    used
                }
                None => i + scanner.feed(b).unwrap().unwrap(),
            };
            assert_eq!(used, head_len, "split at {i}");
            assert_eq!(scanner.headers(), expected().as_slice(), "split at {i}");
        }
    }

    #[test]
    fn byte_by_byte() {
        let mut scanner = HttpHeaderScanner::new(4096);
        let mut used = None;
        for (i, b) in BLOCK.iter().enumerate() {
            if let Some(n) = scanner.feed(std::slice::from_ref(b)).unwrap() {
                used = Some(i + n);
                break;
            }
        }
        assert_eq!(used, Some(BLOCK.len() - 4));
        assert_eq!(scanner.into_headers(), expected());
    }

    #[test]
    fn too_large() {
        let mut scanner = HttpHeaderScanner::new(16);
        assert!(matches!(
            scanner.feed(b"X-Long: 0123456789\r\n"),
            Err(HttpResponseParseError::TooLargeHeader(16))
        ));

        let mut scanner = HttpHeaderScanner::new(16);
        assert!(matches!(scanner.feed(b"X-Long: 0123"), Ok(None)));
        assert!(matches!(
            scanner.feed(b"456789"),
            Err(HttpResponseParseError::TooLargeHeader(16))
        ));
    }
}
