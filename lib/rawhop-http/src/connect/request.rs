/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use rawhop_types::net::{HttpAuth, UpstreamAddr};

pub(super) struct HttpConnectRequest<'a> {
    host: &'a UpstreamAddr,
    auth: &'a HttpAuth,
}

impl<'a> HttpConnectRequest<'a> {
    pub(super) fn new(host: &'a UpstreamAddr, auth: &'a HttpAuth) -> Self {
        HttpConnectRequest { host, auth }
    }

    fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(256);
        buf.put_slice(format!("CONNECT {} HTTP/1.1\r\n", self.host).as_bytes());
        buf.put_slice(format!("Host: {}\r\n", self.host).as_bytes());
        buf.put_slice(b"Proxy-Connection: keep-alive\r\n");
        if let HttpAuth::Basic(username, password) = self.auth {
            let line = crate::header::proxy_authorization_basic(username, password);
            buf.put_slice(line.as_bytes());
        }
        buf.put_slice(b"\r\n");
        buf
    }

    pub(super) async fn send<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let buf = self.encode();
        writer.write_all(buf.as_ref()).await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawhop_types::auth::{Password, Username};
    use rawhop_types::net::Host;

    #[test]
    fn encode() {
        let addr = UpstreamAddr::new(Host::Domain("x.test".to_string()), 443);
        let req = HttpConnectRequest::new(&addr, &HttpAuth::None);
        assert_eq!(
            req.encode().as_ref(),
            b"CONNECT x.test:443 HTTP/1.1\r\nHost: x.test:443\r\nProxy-Connection: keep-alive\r\n\r\n"
        );

        let auth = HttpAuth::Basic(
            Username::from_original("user").unwrap(),
            Password::from_original("pass").unwrap(),
        );
        let req = HttpConnectRequest::new(&addr, &auth);
        let data = req.encode();
        assert!(data.ends_with(b"Proxy-Authorization: Basic dXNlcjpwYXNz\r\n\r\n"));
    }
}
