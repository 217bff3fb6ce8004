/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bytes::{Bytes, BytesMut};
use thiserror::Error;

use crate::{HttpChunkedLine, HttpLineParseError};

#[derive(Debug, Error)]
pub enum HttpChunkedDecodeError {
    #[error("chunk line too long (> {0})")]
    LineTooLong(usize),
    #[error("invalid chunk size line: {0}")]
    InvalidChunkSize(#[from] HttpLineParseError),
    #[error("no line end after chunk data")]
    InvalidChunkEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    ChunkSize,
    Data(u64),
    DataEnd,
    Trailer,
    Finished,
}

/// Push based decoder for chunked transfer encoding.
///
/// Feed it with whatever slices arrive, in order. Lines may be split at any
/// byte across feeds.
pub struct ChunkedDecoder {
    state: DecodeState,
    line: Vec<u8>,
    max_line_size: usize,
    decoded: BytesMut,
}

impl ChunkedDecoder {
    pub fn new(max_line_size: usize) -> Self {
        ChunkedDecoder {
            state: DecodeState::ChunkSize,
            line: Vec::with_capacity(32),
            max_line_size,
            decoded: BytesMut::new(),
        }
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.state == DecodeState::Finished
    }

    #[inline]
    pub fn decoded(&self) -> &[u8] {
        &self.decoded
    }

    pub fn take_decoded(&mut self) -> Bytes {
        self.decoded.split().freeze()
    }

    /// Consume bytes from `buf` and return how many of them were used.
    ///
    /// All of `buf` is used unless the final chunk ends inside it.
    pub fn decode(&mut self, buf: &[u8]) -> Result<usize, HttpChunkedDecodeError> {
        let mut offset = 0;
        while offset < buf.len() {
            let left = &buf[offset..];
            match self.state {
                DecodeState::ChunkSize => {
                    let (nr, complete) = self.read_line(left)?;
                    offset += nr;
                    if complete {
                        let chunk = HttpChunkedLine::parse(&self.line)?;
                        self.state = if chunk.chunk_size == 0 {
                            DecodeState::Trailer
                        } else {
                            DecodeState::Data(chunk.chunk_size)
                        };
                        self.line.clear();
                    }
                }
                DecodeState::Data(size) => {
                    let to_copy = usize::try_from(size)
                        .unwrap_or(usize::MAX)
                        .min(left.len());
                    self.decoded.extend_from_slice(&left[..to_copy]);
                    offset += to_copy;
                    let size = size - to_copy as u64;
                    self.state = if size == 0 {
                        DecodeState::DataEnd
                    } else {
                        DecodeState::Data(size)
                    };
                }
                DecodeState::DataEnd => {
                    let (nr, complete) = self.read_line(left)?;
                    offset += nr;
                    if complete {
                        if !is_empty_line(&self.line) {
                            return Err(HttpChunkedDecodeError::InvalidChunkEnd);
                        }
                        self.line.clear();
                        self.state = DecodeState::ChunkSize;
                    }
                }
                DecodeState::Trailer => {
                    let (nr, complete) = self.read_line(left)?;
                    offset += nr;
                    if complete {
                        if is_empty_line(&self.line) {
                            self.state = DecodeState::Finished;
                        }
                        // trailer fields are dropped
                        self.line.clear();
                    }
                }
                DecodeState::Finished => break,
            }
        }
        Ok(offset)
    }

    /// Append to the pending line, return the used size and if a line end was met
    fn read_line(&mut self, buf: &[u8]) -> Result<(usize, bool), HttpChunkedDecodeError> {
        let (len, complete) = match memchr::memchr(b'\n', buf) {
            Some(p) => (p + 1, true),
            None => (buf.len(), false),
        };
        if self.line.len() + len > self.max_line_size {
            return Err(HttpChunkedDecodeError::LineTooLong(self.max_line_size));
        }
        self.line.extend_from_slice(&buf[..len]);
        Ok((len, complete))
    }
}

fn is_empty_line(line: &[u8]) -> bool {
    matches!(line, b"\n" | b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIKI: &[u8] = b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";

    #[test]
    fn single_feed() {
        let mut decoder = ChunkedDecoder::new(1024);
        assert_eq!(decoder.decode(WIKI).unwrap(), WIKI.len());
        assert!(decoder.finished());
        assert_eq!(decoder.take_decoded().as_ref(), b"Wikipedia");
        assert!(decoder.decoded().is_empty());
    }

    #[test]
    fn every_split_point() {
        for i in 0..=WIKI.len() {
            let mut decoder = ChunkedDecoder::new(1024);
            let (a, b) = WIKI.split_at(i);
            assert_eq!(decoder.decode(a).unwrap(), a.len());
            assert_eq!(decoder.decode(b).unwrap(), b.len());
            assert!(decoder.finished(), "split at {i}");
            assert_eq!(decoder.decoded(), b"Wikipedia");
        }
    }

    #[test]
    fn byte_by_byte() {
        let mut decoder = ChunkedDecoder::new(1024);
        for b in WIKI {
            assert!(!decoder.finished());
            decoder.decode(std::slice::from_ref(b)).unwrap();
        }
        assert!(decoder.finished());
        assert_eq!(decoder.decoded(), b"Wikipedia");
    }

    #[test]
    fn extension_and_trailer() {
        let data = b"5;name=v\r\nhello\r\n0\r\nX-Trailer: 1\r\n\r\nnext";
        let mut decoder = ChunkedDecoder::new(1024);
        let nr = decoder.decode(data).unwrap();
        assert!(decoder.finished());
        assert_eq!(&data[nr..], b"next");
        assert_eq!(decoder.decoded(), b"hello");
    }

    #[test]
    fn bare_lf() {
        let mut decoder = ChunkedDecoder::new(1024);
        decoder.decode(b"3\nabc\n0\n\n").unwrap();
        assert!(decoder.finished());
        assert_eq!(decoder.decoded(), b"abc");
    }

    #[test]
    fn not_finished() {
        let mut decoder = ChunkedDecoder::new(1024);
        decoder.decode(b"a\r\n0123").unwrap();
        assert!(!decoder.finished());
        assert_eq!(decoder.decoded(), b"0123");
    }

    #[test]
    fn invalid() {
        let mut decoder = ChunkedDecoder::new(1024);
        assert!(matches!(
            decoder.decode(b"x\r\n"),
            Err(HttpChunkedDecodeError::InvalidChunkSize(_))
        ));

        let mut decoder = ChunkedDecoder::new(1024);
        assert!(matches!(
            decoder.decode(b"2\r\nabc\r\n"),
            Err(HttpChunkedDecodeError::InvalidChunkEnd)
        ));

        let mut decoder = ChunkedDecoder::new(8);
        assert!(matches!(
            decoder.decode(b"1;0123456789"),
            Err(HttpChunkedDecodeError::LineTooLong(8))
        ));
    }
}
