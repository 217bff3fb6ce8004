/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use rawhop_types::auth::{Password, Username};
use rawhop_types::net::SocksAuth;

use super::{SocksAuthMethod, SocksConnectError, SocksNegotiationError};

pub(super) async fn send_and_recv_method<S>(
    stream: &mut S,
    auth: &SocksAuth,
) -> Result<SocksAuthMethod, SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = BytesMut::with_capacity(4);
    buf.put_u8(0x05);
    match auth {
        SocksAuth::None => {
            buf.put_u8(1);
            buf.put_u8(SocksAuthMethod::None.code());
        }
        SocksAuth::User(_, _) => {
            buf.put_u8(2);
            buf.put_u8(SocksAuthMethod::None.code());
            buf.put_u8(SocksAuthMethod::User.code());
        }
    }
    stream
        .write_all(buf.as_ref())
        .await
        .map_err(SocksConnectError::WriteFailed)?;
    stream.flush().await.map_err(SocksConnectError::WriteFailed)?;

    let mut rsp = [0u8; 2];
    stream
        .read_exact(&mut rsp)
        .await
        .map_err(SocksConnectError::ReadFailed)?;
    if rsp[0] != 0x05 {
        return Err(SocksNegotiationError::InvalidVersion.into());
    }
    Ok(SocksAuthMethod::from(rsp[1]))
}

/// username/password sub-negotiation, rfc1929
pub(super) async fn proceed_with_user<S>(
    stream: &mut S,
    username: &Username,
    password: &Password,
) -> Result<(), SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let ulen = username.len();
    let plen = password.len();
    let mut buf = BytesMut::with_capacity(3 + ulen as usize + plen as usize);
    buf.put_u8(0x01);
    buf.put_u8(ulen);
    buf.put_slice(username.as_original().as_bytes());
    buf.put_u8(plen);
    buf.put_slice(password.as_original().as_bytes());
    stream
        .write_all(buf.as_ref())
        .await
        .map_err(SocksConnectError::WriteFailed)?;
    stream.flush().await.map_err(SocksConnectError::WriteFailed)?;

    let mut rsp = [0u8; 2];
    stream
        .read_exact(&mut rsp)
        .await
        .map_err(SocksConnectError::ReadFailed)?;
    if rsp[0] != 0x01 {
        return Err(SocksNegotiationError::InvalidUserAuthMsg.into());
    }
    if rsp[1] != 0x00 {
        return Err(SocksConnectError::AuthFailed);
    }
    Ok(())
}
