/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bytes::{Bytes, BytesMut};
use http::{HeaderName, Method, Version, header};
use tokio::io::AsyncRead;

use rawhop_io_ext::StreamBufReader;
use rawhop_types::net::HttpHeaderMap;

use super::{HttpHeaderScanner, HttpResponse, HttpResponseContent, HttpResponseParseError};
use crate::{
    ChunkedDecoder, ContentEncoding, HttpBodyType, HttpLineParseError, HttpRequest,
    HttpStatusLine,
};

const DEFAULT_MAX_HEADER_SIZE: usize = 64 * 1024;
const DEFAULT_MAX_CHUNK_LINE_SIZE: usize = 4096;
const BODY_PREALLOC_LIMIT: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpResponseParser {
    max_header_size: usize,
    max_chunk_line_size: usize,
    read_body: bool,
}

impl Default for HttpResponseParser {
    fn default() -> Self {
        HttpResponseParser::new(DEFAULT_MAX_HEADER_SIZE)
    }
}

impl HttpResponseParser {
    pub fn new(max_header_size: usize) -> Self {
        HttpResponseParser {
            max_header_size,
            max_chunk_line_size: DEFAULT_MAX_CHUNK_LINE_SIZE,
            read_body: true,
        }
    }

    /// If disabled, the body is left unread and an empty one is returned
    pub fn set_read_body(&mut self, read_body: bool) {
        self.read_body = read_body;
    }

    pub fn set_max_chunk_line_size(&mut self, size: usize) {
        self.max_chunk_line_size = size;
    }

    /// Read one response for `request` from `reader`.
    ///
    /// Cookies set by the response are stored into the cookie store of the
    /// request, and the request is moved into the returned response.
    pub async fn parse<R>(
        &self,
        reader: &mut StreamBufReader<R>,
        request: HttpRequest,
    ) -> Result<HttpResponse, HttpResponseParseError>
    where
        R: AsyncRead + Unpin,
    {
        let (version, code, reason) = self.read_status_line(reader).await?;
        let lines = self.read_header_block(reader).await?;

        let mut rsp = HttpResponse {
            version,
            code,
            reason,
            headers: HttpHeaderMap::default(),
            content: HttpResponseContent::default(),
            request,
        };
        rsp.fold_header_lines(lines);

        if !self.read_body || rsp.no_body() {
            return Ok(rsp);
        }

        let body_type = rsp.body_type();
        log::trace!("response body type: {body_type:?}");
        let body = self.read_body(reader, body_type).await?;
        rsp.content.body = decode_content(&rsp.content.headers, body)?;
        Ok(rsp)
    }

    async fn read_status_line<R>(
        &self,
        reader: &mut StreamBufReader<R>,
    ) -> Result<(Version, u16, String), HttpResponseParseError>
    where
        R: AsyncRead + Unpin,
    {
        loop {
            let data = reader.read().await?;
            if let Some(p) = memchr::memchr(b'\n', data.buffer) {
                if p >= self.max_header_size {
                    return Err(HttpResponseParseError::TooLargeHeader(self.max_header_size));
                }
                let line = &data.buffer[..p];
                let r = match HttpStatusLine::parse(line) {
                    Ok(s) => Ok((s.version, s.code, s.reason.to_string())),
                    Err(HttpLineParseError::UnsupportedVersion) => Err(
                        HttpResponseParseError::UnsupportedVersion(line_text(line)),
                    ),
                    Err(e) => {
                        log::trace!("invalid status line: {e}");
                        Err(HttpResponseParseError::InvalidStatusLine(line_text(line)))
                    }
                };
                reader.advance(p + 1);
                return r;
            }

            if data.buffer.len() >= self.max_header_size {
                return Err(HttpResponseParseError::TooLargeHeader(self.max_header_size));
            }
            if data.is_completed {
                return if data.buffer.is_empty() {
                    Err(HttpResponseParseError::UnexpectedEof("status line"))
                } else {
                    Err(HttpResponseParseError::InvalidStatusLine(line_text(
                        data.buffer,
                    )))
                };
            }
            reader.advance(0);
        }
    }

    async fn read_header_block<R>(
        &self,
        reader: &mut StreamBufReader<R>,
    ) -> Result<Vec<(String, String)>, HttpResponseParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut scanner = HttpHeaderScanner::new(self.max_header_size);
        loop {
            let data = reader.read().await?;
            let is_completed = data.is_completed;
            let len = data.buffer.len();
            match scanner.feed(data.buffer)? {
                Some(used) => {
                    if used > 0 {
                        reader.advance(used);
                    }
                    return Ok(scanner.into_headers());
                }
                None => {
                    if is_completed {
                        return Err(HttpResponseParseError::UnexpectedEof("header"));
                    }
                    reader.advance(len);
                }
            }
        }
    }

    async fn read_body<R>(
        &self,
        reader: &mut StreamBufReader<R>,
        body_type: HttpBodyType,
    ) -> Result<Bytes, HttpResponseParseError>
    where
        R: AsyncRead + Unpin,
    {
        match body_type {
            HttpBodyType::ContentLength(0) => Ok(Bytes::new()),
            HttpBodyType::ContentLength(total) => {
                let mut body = BytesMut::with_capacity(total.min(BODY_PREALLOC_LIMIT) as usize);
                let mut left = total;
                while left > 0 {
                    let data = reader.read().await?;
                    if data.buffer.is_empty() {
                        return Err(HttpResponseParseError::UnexpectedEof("body"));
                    }
                    let n = usize::try_from(left)
                        .unwrap_or(usize::MAX)
                        .min(data.buffer.len());
                    body.extend_from_slice(&data.buffer[..n]);
                    reader.advance(n);
                    left -= n as u64;
                }
                Ok(body.freeze())
            }
            HttpBodyType::Chunked => {
                let mut decoder = ChunkedDecoder::new(self.max_chunk_line_size);
                while !decoder.finished() {
                    let data = reader.read().await?;
                    if data.buffer.is_empty() {
                        return Err(HttpResponseParseError::UnexpectedEof("chunked body"));
                    }
                    let is_completed = data.is_completed;
                    let used = decoder.decode(data.buffer)?;
                    if used == 0 && is_completed {
                        return Err(HttpResponseParseError::UnexpectedEof("chunked body"));
                    }
                    reader.advance(used);
                }
                Ok(decoder.take_decoded())
            }
            HttpBodyType::ReadUntilEnd => {
                let mut body = BytesMut::new();
                loop {
                    let data = reader.read().await?;
                    if data.buffer.is_empty() {
                        break;
                    }
                    body.extend_from_slice(data.buffer);
                    let len = data.buffer.len();
                    reader.advance(len);
                }
                Ok(body.freeze())
            }
        }
    }
}

impl HttpResponse {
    fn fold_header_lines(&mut self, lines: Vec<(String, String)>) {
        for (name, value) in lines {
            let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                log::trace!("ignore header with invalid name {name}");
                continue;
            };
            if header_name == header::SET_COOKIE || header_name.as_str() == "set-cookie2" {
                self.request.cookies.set_cookie(&self.request.uri, &value);
            }
            if crate::header::is_content_header(&header_name) {
                self.content.headers.append(header_name, &name, value);
            } else {
                self.headers.append(header_name, &name, value);
            }
        }
    }

    fn no_body(&self) -> bool {
        self.request.method == Method::HEAD
            || (100..200).contains(&self.code)
            || self.code == 204
            || self.code == 304
    }

    fn body_type(&self) -> HttpBodyType {
        let headers = &self.content.headers;
        if headers.contains_key(&header::TRANSFER_ENCODING) {
            return HttpBodyType::Chunked;
        }
        match headers
            .get_first(&header::CONTENT_LENGTH)
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            Some(len) => HttpBodyType::ContentLength(len),
            None => HttpBodyType::ReadUntilEnd,
        }
    }
}

fn line_text(line: &[u8]) -> String {
    String::from_utf8_lossy(line).trim_end().to_string()
}

fn decode_content(headers: &HttpHeaderMap, body: Bytes) -> Result<Bytes, HttpResponseParseError> {
    let Some(entry) = headers.get(&header::CONTENT_ENCODING) else {
        return Ok(body);
    };
    let mut encodings = Vec::new();
    for value in entry.values() {
        let list = ContentEncoding::parse_list(value)
            .map_err(HttpResponseParseError::UnsupportedContentEncoding)?;
        encodings.extend(list);
    }
    if body.is_empty() {
        return Ok(body);
    }

    let mut data = body;
    // the last applied coding is listed last
    for encoding in encodings.iter().rev() {
        if *encoding == ContentEncoding::Identity {
            continue;
        }
        let decoded = encoding
            .decode(&data)
            .map_err(|e| HttpResponseParseError::DecodeFailed(encoding.as_str(), e))?;
        data = Bytes::from(decoded);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CookieStore;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tokio_test::io::Builder;
    use tokio_util::io::StreamReader;
    use url::Url;

    fn get(uri: &str) -> HttpRequest {
        HttpRequest::new(Method::GET, Url::parse(uri).unwrap())
    }

    async fn parse_chunks(data: &[u8], chunk_size: usize) -> HttpResponse {
        let chunks: Vec<_> = data
            .chunks(chunk_size)
            .map(|c| Ok::<_, std::io::Error>(Bytes::copy_from_slice(c)))
            .collect();
        let stream = StreamReader::new(tokio_stream::iter(chunks));
        let mut reader = StreamBufReader::new(stream);
        HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn content_length_any_chunking() {
        let mut data = b"HTTP/1.1 200 OK\r\nContent-Length: 300\r\nX-A: 1\r\n\r\n".to_vec();
        let body: Vec<u8> = (0..300u32).map(|i| (i % 251) as u8).collect();
        data.extend_from_slice(&body);

        for chunk_size in [1, 37, data.len()] {
            let rsp = parse_chunks(&data, chunk_size).await;
            assert_eq!(rsp.code, 200);
            assert_eq!(rsp.reason, "OK");
            assert_eq!(rsp.version, Version::HTTP_11);
            assert_eq!(rsp.headers.get_first(&HeaderName::from_static("x-a")), Some("1"));
            assert_eq!(rsp.content.body.as_ref(), body.as_slice(), "chunk {chunk_size}");
        }
    }

    #[tokio::test]
    async fn chunked() {
        let data = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
            4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
        for chunk_size in [1, 7, data.len()] {
            let rsp = parse_chunks(data, chunk_size).await;
            assert_eq!(rsp.content.text(), "Wikipedia");
            assert!(rsp.content.headers.contains_key(&header::TRANSFER_ENCODING));
            assert!(!rsp.headers.contains_key(&header::TRANSFER_ENCODING));
        }
    }

    #[tokio::test]
    async fn set_cookie_with_expiry() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\n")
            .read(b"Set-Cookie: b=2; expires=Thu, 01 Jan 1970 00:00:00 GMT\r\n")
            .read(b"Content-Length: 0\r\n\r\n")
            .build();
        let mut reader = StreamBufReader::new(stream);
        let cookies = CookieStore::new();
        let req = get("http://x.test/").with_cookie_store(cookies.clone());
        let rsp = HttpResponseParser::default()
            .parse(&mut reader, req)
            .await
            .unwrap();
        assert_eq!(cookies.get("x.test", "a").as_deref(), Some("1"));
        assert!(cookies.get("x.test", "b").is_none());
        assert_eq!(cookies.len(), 1);
        assert_eq!(rsp.headers.get(&header::SET_COOKIE).unwrap().values().len(), 2);
    }

    #[tokio::test]
    async fn unsupported_encoding() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nContent-Encoding: unsupported-codec\r\n")
            .read(b"Content-Length: 4\r\n\r\nabcd")
            .build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        let HttpResponseParseError::UnsupportedContentEncoding(name) = err else {
            panic!("unexpected error {err}");
        };
        assert_eq!(name, "unsupported-codec");
    }

    #[tokio::test]
    async fn gzip_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed text").unwrap();
        let body = encoder.finish().unwrap();
        let mut data = format!(
            "HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        data.extend_from_slice(&body);

        let rsp = parse_chunks(&data, 16).await;
        assert_eq!(rsp.content.text(), "compressed text");
    }

    #[tokio::test]
    async fn read_until_close() {
        let data = b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nall the rest";
        let rsp = parse_chunks(data, 5).await;
        assert_eq!(rsp.version, Version::HTTP_10);
        assert_eq!(rsp.content.text(), "all the rest");
        assert_eq!(
            rsp.content.headers.get_first(&header::CONTENT_TYPE),
            Some("text/plain")
        );
    }

    #[tokio::test]
    async fn no_body_cases() {
        for (method, head) in [
            (Method::HEAD, "HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n"),
            (Method::GET, "HTTP/1.1 204 No Content\r\nContent-Length: 10\r\n\r\n"),
            (Method::GET, "HTTP/1.1 304 Not Modified\r\n\r\n"),
            (Method::GET, "HTTP/1.1 101 Switching Protocols\r\n\r\n"),
        ] {
            let stream = Builder::new().read(head.as_bytes()).build();
            let mut reader = StreamBufReader::new(stream);
            let req = HttpRequest::new(method, Url::parse("http://x.test/").unwrap());
            let rsp = HttpResponseParser::default()
                .parse(&mut reader, req)
                .await
                .unwrap();
            assert!(rsp.content.body.is_empty());
        }
    }

    #[tokio::test]
    async fn skip_body_reading() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n")
            .build();
        let mut reader = StreamBufReader::new(stream);
        let mut parser = HttpResponseParser::default();
        parser.set_read_body(false);
        let rsp = parser.parse(&mut reader, get("http://x.test/")).await.unwrap();
        assert_eq!(rsp.code, 200);
        assert!(rsp.content.body.is_empty());
    }

    #[tokio::test]
    async fn status_line_errors() {
        let stream = Builder::new().read(b"HTTP/2 200 OK\r\n\r\n").build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpResponseParseError::UnsupportedVersion(ref s) if s == "HTTP/2 200 OK"));

        let stream = Builder::new().read(b"SSH-2.0-OpenSSH\r\n").build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpResponseParseError::InvalidStatusLine(ref s) if s == "SSH-2.0-OpenSSH"));

        let stream = Builder::new().build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpResponseParseError::UnexpectedEof("status line")));
    }

    #[tokio::test]
    async fn truncated() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nContent-Len")
            .build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpResponseParseError::UnexpectedEof("header")));

        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nshort")
            .build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpResponseParseError::UnexpectedEof("body")));

        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWi")
            .build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::default()
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpResponseParseError::UnexpectedEof("chunked body")));
    }

    #[tokio::test]
    async fn too_large_header() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nX-Long: 0123456789012345678901234567890123456789\r\n\r\n")
            .build();
        let mut reader = StreamBufReader::new(stream);
        let err = HttpResponseParser::new(32)
            .parse(&mut reader, get("http://x.test/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpResponseParseError::TooLargeHeader(32)));
    }
}
