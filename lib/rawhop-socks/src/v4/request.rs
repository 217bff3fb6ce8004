/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;

use bytes::{BufMut, BytesMut};

use rawhop_types::net::{Host, UpstreamAddr};

use super::{SOCKS_CMD_TCP_CONNECT, SocksConnectError};

pub(super) struct SocksV4Request;

impl SocksV4Request {
    /// Encode a connect request, a domain host makes it a socks4a request
    pub(super) fn encode_connect(
        addr: &UpstreamAddr,
        user_id: &str,
    ) -> Result<BytesMut, SocksConnectError> {
        let mut buf = BytesMut::with_capacity(1 + 1 + 2 + 4 + user_id.len() + 1);
        buf.put_u8(0x04);
        buf.put_u8(SOCKS_CMD_TCP_CONNECT);
        buf.put_u16(addr.port());
        match addr.host() {
            Host::Ip(IpAddr::V4(ip4)) => {
                buf.put_slice(&ip4.octets());
                buf.put_slice(user_id.as_bytes());
                buf.put_u8(0x00);
            }
            Host::Ip(IpAddr::V6(_)) => {
                return Err(SocksConnectError::UnsupportedRemoteAddress(
                    "ipv6 address is not supported by socks4",
                ));
            }
            Host::Domain(domain) => {
                if domain.is_empty() {
                    return Err(SocksConnectError::UnsupportedRemoteAddress("empty domain"));
                }
                buf.reserve(domain.len() + 1);
                buf.put_slice(&[0x00, 0x00, 0x00, 0x01]);
                buf.put_slice(user_id.as_bytes());
                buf.put_u8(0x00);
                buf.put_slice(domain.as_bytes());
                buf.put_u8(0x00);
            }
        }
        Ok(buf)
    }
}
