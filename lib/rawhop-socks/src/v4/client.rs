/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use rawhop_types::net::UpstreamAddr;

use super::{SocksConnectError, SocksV4Reply, SocksV4Request};

/// tcp connect through a socks4 proxy
///
/// A domain target is sent to the proxy as socks4a, resolve it before calling
/// if the proxy only speaks plain socks4.
pub async fn socks4_connect_to<S>(
    stream: &mut S,
    user_id: &str,
    addr: &UpstreamAddr,
) -> Result<(), SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let buf = SocksV4Request::encode_connect(addr, user_id)?;
    stream
        .write_all(buf.as_ref())
        .await
        .map_err(SocksConnectError::WriteFailed)?;
    stream.flush().await.map_err(SocksConnectError::WriteFailed)?;

    let rsp = SocksV4Reply::recv(stream).await?;
    match rsp {
        SocksV4Reply::RequestGranted => Ok(()),
        _ => Err(SocksConnectError::RequestFailed(format!(
            "request failed: {}",
            rsp.error_message()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawhop_types::net::Host;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn granted() {
        let mut stream = Builder::new()
            .write(b"\x04\x01\x00\x50\x00\x00\x00\x01\x00x.test\x00")
            .read(&[0, 90, 0, 0, 0, 0, 0, 0])
            .build();
        let addr = UpstreamAddr::new(Host::Domain("x.test".to_string()), 80);
        socks4_connect_to(&mut stream, "", &addr).await.unwrap();
    }

    #[tokio::test]
    async fn rejected() {
        let mut stream = Builder::new()
            .write(b"\x04\x01\x00\x50\x00\x00\x00\x01\x00x.test\x00")
            .read(&[0, 91, 0, 0, 0, 0, 0, 0])
            .build();
        let addr = UpstreamAddr::new(Host::Domain("x.test".to_string()), 80);
        let err = socks4_connect_to(&mut stream, "", &addr).await.unwrap_err();
        assert!(matches!(err, SocksConnectError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn closed() {
        let mut stream = Builder::new()
            .write(b"\x04\x01\x00\x50\x00\x00\x00\x01\x00x.test\x00")
            .read(&[0, 90])
            .build();
        let addr = UpstreamAddr::new(Host::Domain("x.test".to_string()), 80);
        let err = socks4_connect_to(&mut stream, "", &addr).await.unwrap_err();
        assert!(matches!(err, SocksConnectError::ReadFailed(_)));
    }
}
