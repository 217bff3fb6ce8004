/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

const DEFAULT_READ_SIZE: usize = 16 * 1024;

/// The view returned by [`StreamBufReader::read`]
pub struct BufferedData<'a> {
    pub buffer: &'a [u8],
    /// the underlying stream has ended, no more data will follow
    pub is_completed: bool,
}

/// Pull based incremental reader.
///
/// `read` returns all the buffered but not yet consumed bytes. The caller then
/// calls `advance(n)` to consume `n` of them, or `advance(0)` to tell that
/// everything offered was examined and more data is needed. In the later case
/// the next `read` will append new data to what is already buffered.
pub struct StreamBufReader<R> {
    inner: R,
    buf: BytesMut,
    need_more: bool,
    eof: bool,
    read_size: usize,
    recv_timeout: Option<Duration>,
}

impl<R> StreamBufReader<R> {
    pub fn new(inner: R) -> Self {
        StreamBufReader {
            inner,
            buf: BytesMut::with_capacity(DEFAULT_READ_SIZE),
            need_more: false,
            eof: false,
            read_size: DEFAULT_READ_SIZE,
            recv_timeout: None,
        }
    }

    /// Bound the wait time of each single read on the underlying stream
    pub fn set_recv_timeout(&mut self, timeout: Duration) {
        self.recv_timeout = Some(timeout);
    }

    pub fn set_read_size(&mut self, size: usize) {
        self.read_size = size.max(1);
    }

    /// Bytes buffered but not consumed yet
    #[inline]
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.eof
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn advance(&mut self, n: usize) {
        if n == 0 {
            self.need_more = true;
        } else {
            let n = n.min(self.buf.len());
            self.buf.advance(n);
            self.need_more = false;
        }
    }
}

impl<R> StreamBufReader<R>
where
    R: AsyncRead + Unpin,
{
    pub async fn read(&mut self) -> io::Result<BufferedData<'_>> {
        if (self.buf.is_empty() || self.need_more) && !self.eof {
            self.fill().await?;
        }
        self.need_more = false;
        Ok(BufferedData {
            buffer: &self.buf,
            is_completed: self.eof,
        })
    }

    async fn fill(&mut self) -> io::Result<()> {
        self.buf.reserve(self.read_size);
        let nr = match self.recv_timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, self.inner.read_buf(&mut self.buf)).await {
                    Ok(r) => r?,
                    Err(_) => {
                        return Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "receive timed out",
                        ));
                    }
                }
            }
            None => self.inner.read_buf(&mut self.buf).await?,
        };
        if nr == 0 {
            self.eof = true;
        }
        Ok(())
    }
}
