/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::io::AsyncBufRead;

#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct LimitedReadUntil<'a, R: ?Sized> {
    reader: &'a mut R,
    delimiter: u8,
    max_len: usize,
    buf: &'a mut Vec<u8>,
    read: usize,
}

impl<'a, R> LimitedReadUntil<'a, R>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    pub(super) fn new(reader: &'a mut R, delimiter: u8, max_len: usize, buf: &'a mut Vec<u8>) -> Self {
        LimitedReadUntil {
            reader,
            delimiter,
            max_len,
            buf,
            read: 0,
        }
    }
}

impl<R> Future for LimitedReadUntil<'_, R>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    type Output = io::Result<(bool, usize)>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let me = self.get_mut();
        loop {
            let (found, used) = {
                let available = ready!(Pin::new(&mut *me.reader).poll_fill_buf(cx))?;
                if available.is_empty() {
                    return Poll::Ready(Ok((false, me.read)));
                }
                let left = me.max_len - me.read;
                let available = if available.len() > left {
                    &available[..left]
                } else {
                    available
                };
                match memchr::memchr(me.delimiter, available) {
                    Some(i) => {
                        me.buf.extend_from_slice(&available[..=i]);
                        (true, i + 1)
                    }
                    None => {
                        me.buf.extend_from_slice(available);
                        (false, available.len())
                    }
                }
            };
            Pin::new(&mut *me.reader).consume(used);
            me.read += used;
            if found || me.read >= me.max_len {
                return Poll::Ready(Ok((found, me.read)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::LimitedBufReadExt;
    use bytes::Bytes;
    use tokio::io::BufReader;
    use tokio_stream::iter;
    use tokio_util::io::StreamReader;

    #[tokio::test]
    async fn read_split_line() {
        let content1 = b"HTTP/1.1 200 Connection";
        let content2 = b" established\r\nrest";
        let stream = iter(vec![
            Ok::<_, std::io::Error>(Bytes::from_static(content1)),
            Ok(Bytes::from_static(content2)),
        ]);
        let mut reader = BufReader::new(StreamReader::new(stream));

        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 1024, &mut buf).await.unwrap();
        assert!(found);
        assert_eq!(nr, 37);
        assert_eq!(buf, b"HTTP/1.1 200 Connection established\r\n");

        buf.clear();
        let (found, nr) = reader.limited_read_until(b'\n', 1024, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(nr, 4);
    }

    #[tokio::test]
    async fn read_limited() {
        let stream = iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(
            b"0123456789\n",
        ))]);
        let mut reader = BufReader::new(StreamReader::new(stream));

        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 4, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(nr, 4);
        assert_eq!(buf, b"0123");
    }
}
