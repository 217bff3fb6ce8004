/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use rawhop_types::net::{SocksAuth, UpstreamAddr};

use super::{Socks5Reply, Socks5Request, SocksAuthMethod, SocksConnectError, auth};

async fn socks5_login<S>(stream: &mut S, auth: &SocksAuth) -> Result<(), SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let auth_method = auth::send_and_recv_method(stream, auth).await?;
    match auth_method {
        SocksAuthMethod::None => Ok(()),
        SocksAuthMethod::User => {
            if let SocksAuth::User(username, password) = auth {
                auth::proceed_with_user(stream, username, password).await
            } else {
                Err(SocksConnectError::NoAuthMethodAvailable)
            }
        }
        _ => Err(SocksConnectError::NoAuthMethodAvailable),
    }
}

/// tcp connect through a socks5 proxy
///
/// return the bind address reported by the proxy
pub async fn socks5_connect_to<S>(
    stream: &mut S,
    auth: &SocksAuth,
    addr: &UpstreamAddr,
) -> Result<UpstreamAddr, SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    socks5_login(stream, auth).await?;

    let buf = Socks5Request::encode_connect(addr)?;
    stream
        .write_all(buf.as_ref())
        .await
        .map_err(SocksConnectError::WriteFailed)?;
    stream.flush().await.map_err(SocksConnectError::WriteFailed)?;

    let rsp = Socks5Reply::recv(stream).await?;
    match rsp {
        Socks5Reply::Succeeded(addr) => Ok(addr),
        Socks5Reply::ConnectionTimedOut => Err(SocksConnectError::PeerTimeout),
        _ => Err(SocksConnectError::RequestFailed(format!(
            "request failed: {}",
            rsp.error_message()
        ))),
    }
}
