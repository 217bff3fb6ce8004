/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use tokio::io::AsyncBufRead;

use rawhop_io_ext::LimitedBufReadExt;

use super::{HttpConnectError, HttpConnectResponseError};
use crate::{HttpHeaderLine, HttpStatusLine};

#[derive(Debug)]
pub(super) struct HttpConnectResponse {
    pub(super) code: u16,
    pub(super) reason: String,
}

impl HttpConnectResponse {
    fn build_from_status_line(line_buf: &[u8]) -> Result<Self, HttpConnectResponseError> {
        let rsp =
            HttpStatusLine::parse(line_buf).map_err(HttpConnectResponseError::InvalidStatusLine)?;
        Ok(HttpConnectResponse {
            code: rsp.code,
            reason: rsp.reason.to_string(),
        })
    }

    /// Read one line into `line_buf`, return the size read
    async fn read_line<R>(
        reader: &mut R,
        line_buf: &mut Vec<u8>,
        max_len: usize,
        max_header_size: usize,
    ) -> Result<usize, HttpConnectError>
    where
        R: AsyncBufRead + Unpin,
    {
        line_buf.clear();
        let (found, nr) = reader
            .limited_read_until(b'\n', max_len, line_buf)
            .await
            .map_err(HttpConnectError::ReadFailed)?;
        if nr == 0 {
            return Err(HttpConnectError::RemoteClosed);
        }
        if !found {
            return if nr < max_len {
                Err(HttpConnectError::RemoteClosed)
            } else {
                Err(HttpConnectResponseError::TooLargeHeader(max_header_size).into())
            };
        }
        Ok(nr)
    }

    async fn parse<R>(reader: &mut R, max_header_size: usize) -> Result<Self, HttpConnectError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line_buf = Vec::<u8>::with_capacity(1024);

        let mut header_size =
            Self::read_line(reader, &mut line_buf, max_header_size, max_header_size).await?;
        let rsp = HttpConnectResponse::build_from_status_line(line_buf.as_ref())?;

        loop {
            if header_size >= max_header_size {
                return Err(HttpConnectResponseError::TooLargeHeader(max_header_size).into());
            }
            let max_len = max_header_size - header_size;
            header_size += Self::read_line(reader, &mut line_buf, max_len, max_header_size).await?;
            if line_buf.as_slice() == b"\n" || line_buf.as_slice() == b"\r\n" {
                // header end line
                break;
            }

            HttpHeaderLine::parse(line_buf.as_ref())
                .map_err(HttpConnectResponseError::InvalidHeaderLine)?;
        }

        Ok(rsp)
    }

    fn detect_error(&self) -> Result<(), HttpConnectError> {
        if (200..300).contains(&self.code) {
            Ok(())
        } else if self.code == 504 || self.code == 522 || self.code == 524 {
            // the proxy timed out on the target
            Err(HttpConnectError::PeerTimeout(self.code))
        } else {
            Err(HttpConnectError::UnexpectedStatusCode(
                self.code,
                self.reason.to_string(),
            ))
        }
    }

    pub(super) async fn recv<R>(r: &mut R, max_header_size: usize) -> Result<Self, HttpConnectError>
    where
        R: AsyncBufRead + Unpin,
    {
        let rsp = HttpConnectResponse::parse(r, max_header_size).await?;
        rsp.detect_error()?;
        Ok(rsp)
    }
}
