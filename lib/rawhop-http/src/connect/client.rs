/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncRead, AsyncWrite, BufReader};

use rawhop_types::net::{HttpAuth, UpstreamAddr};

use super::{HttpConnectError, HttpConnectRequest, HttpConnectResponse};

/// Open a tunnel to `addr` through a http proxy
pub async fn http_connect_to<S>(
    stream: &mut S,
    auth: &HttpAuth,
    addr: &UpstreamAddr,
    max_header_size: usize,
) -> Result<(), HttpConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let req = HttpConnectRequest::new(addr, auth);
    req.send(stream)
        .await
        .map_err(HttpConnectError::WriteFailed)?;

    let mut buf_stream = BufReader::new(&mut *stream);
    let rsp = HttpConnectResponse::recv(&mut buf_stream, max_header_size).await?;
    if !buf_stream.buffer().is_empty() {
        return Err(HttpConnectError::UnexpectedData);
    }
    log::debug!("http tunnel to {addr} established: {} {}", rsp.code, rsp.reason);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawhop_types::net::Host;
    use tokio_test::io::Builder;

    const REQUEST: &[u8] =
        b"CONNECT x.test:443 HTTP/1.1\r\nHost: x.test:443\r\nProxy-Connection: keep-alive\r\n\r\n";

    fn target() -> UpstreamAddr {
        UpstreamAddr::new(Host::Domain("x.test".to_string()), 443)
    }

    #[tokio::test]
    async fn established() {
        let mut stream = Builder::new()
            .write(REQUEST)
            .read(b"HTTP/1.1 200 Connection established\r\n\r\n")
            .build();
        http_connect_to(&mut stream, &HttpAuth::None, &target(), 4096)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn auth_required() {
        let mut stream = Builder::new()
            .write(REQUEST)
            .read(b"HTTP/1.1 407 Proxy Authentication Required\r\nContent-Length: 0\r\n\r\n")
            .build();
        let err = http_connect_to(&mut stream, &HttpAuth::None, &target(), 4096)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HttpConnectError::UnexpectedStatusCode(407, ref reason) if reason == "Proxy Authentication Required"
        ));
    }

    #[tokio::test]
    async fn gateway_timeout() {
        let mut stream = Builder::new()
            .write(REQUEST)
            .read(b"HTTP/1.1 504 Gateway Timeout\r\n\r\n")
            .build();
        let err = http_connect_to(&mut stream, &HttpAuth::None, &target(), 4096)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpConnectError::PeerTimeout(504)));
    }

    #[tokio::test]
    async fn early_data() {
        let mut stream = Builder::new()
            .write(REQUEST)
            .read(b"HTTP/1.1 200 OK\r\n\r\nsurprise")
            .build();
        let err = http_connect_to(&mut stream, &HttpAuth::None, &target(), 4096)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpConnectError::UnexpectedData));
    }
}
