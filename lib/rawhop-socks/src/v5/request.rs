/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;

use bytes::{BufMut, BytesMut};

use rawhop_types::net::{Host, UpstreamAddr};

use super::{SOCKS_CMD_TCP_CONNECT, SocksConnectError};

pub(super) struct Socks5Request;

impl Socks5Request {
    pub(super) fn encode_connect(addr: &UpstreamAddr) -> Result<BytesMut, SocksConnectError> {
        let mut buf = BytesMut::with_capacity(256 + 6);
        buf.put_u8(0x05);
        buf.put_u8(SOCKS_CMD_TCP_CONNECT);
        buf.put_u8(0x00);
        match addr.host() {
            Host::Domain(domain) => {
                if domain.is_empty() || domain.len() > u8::MAX as usize {
                    return Err(SocksConnectError::UnsupportedRemoteAddress(
                        "domain length out of range",
                    ));
                }
                buf.put_u8(0x03);
                buf.put_u8(domain.len() as u8);
                buf.put_slice(domain.as_bytes());
            }
            Host::Ip(IpAddr::V4(ip4)) => {
                buf.put_u8(0x01);
                buf.put_slice(&ip4.octets());
            }
            Host::Ip(IpAddr::V6(ip6)) => {
                buf.put_u8(0x04);
                buf.put_slice(&ip6.octets());
            }
        }
        buf.put_u16(addr.port());
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_domain() {
        let addr = UpstreamAddr::new(Host::Domain("a.test".to_string()), 443);
        let buf = Socks5Request::encode_connect(&addr).unwrap();
        assert_eq!(buf.as_ref(), b"\x05\x01\x00\x03\x06a.test\x01\xbb");
    }

    #[test]
    fn encode_ip6() {
        let addr = UpstreamAddr::new(Host::Ip("::1".parse().unwrap()), 80);
        let buf = Socks5Request::encode_connect(&addr).unwrap();
        assert_eq!(buf.len(), 4 + 16 + 2);
        assert_eq!(buf[3], 0x04);
    }

    #[test]
    fn too_long_domain() {
        let addr = UpstreamAddr::new(Host::Domain("a".repeat(256)), 80);
        assert!(Socks5Request::encode_connect(&addr).is_err());
    }
}
