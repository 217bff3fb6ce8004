/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Read};
use std::str::FromStr;

use flate2::bufread::{DeflateDecoder, GzDecoder, ZlibDecoder};

const BROTLI_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Brotli,
    Zstd,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Identity => "identity",
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Deflate => "deflate",
            ContentEncoding::Brotli => "br",
            ContentEncoding::Zstd => "zstd",
        }
    }

    /// Parse a comma separated `Content-Encoding` value.
    ///
    /// The first unknown coding is returned as error.
    pub fn parse_list(value: &str) -> Result<Vec<ContentEncoding>, String> {
        value
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| ContentEncoding::from_str(s).map_err(|_| s.to_string()))
            .collect()
    }

    pub fn decode(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 4);
        match self {
            ContentEncoding::Identity => out.extend_from_slice(data),
            ContentEncoding::Gzip => {
                GzDecoder::new(data).read_to_end(&mut out)?;
            }
            ContentEncoding::Deflate => {
                // servers disagree on whether deflate means zlib or raw deflate
                if ZlibDecoder::new(data).read_to_end(&mut out).is_err() {
                    out.clear();
                    DeflateDecoder::new(data).read_to_end(&mut out)?;
                }
            }
            ContentEncoding::Brotli => {
                brotli::Decompressor::new(data, BROTLI_BUFFER_SIZE).read_to_end(&mut out)?;
            }
            ContentEncoding::Zstd => {
                out = zstd::stream::decode_all(data)?;
            }
        }
        Ok(out)
    }
}

impl FromStr for ContentEncoding {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" => Ok(ContentEncoding::Identity),
            "gzip" | "x-gzip" => Ok(ContentEncoding::Gzip),
            "deflate" => Ok(ContentEncoding::Deflate),
            "br" => Ok(ContentEncoding::Brotli),
            "zstd" => Ok(ContentEncoding::Zstd),
            _ => Err(()),
        }
    }
}
