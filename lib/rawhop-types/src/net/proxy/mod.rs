/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use thiserror::Error;
use url::Url;

use super::UpstreamAddr;
use crate::auth::AuthParseError;

mod http;
pub use self::http::HttpProxy;

mod socks4;
pub use socks4::Socks4Proxy;

mod socks5;
pub use socks5::Socks5Proxy;

#[derive(Debug, Error)]
pub enum ProxyParseError {
    #[error("invalid scheme")]
    InvalidScheme,
    #[error("no host found")]
    NoHostFound,
    #[error("auth parse failed: {0}")]
    InvalidAuth(#[from] AuthParseError),
}

#[derive(Clone, Debug)]
pub enum Proxy {
    Http(HttpProxy),
    Socks4(Socks4Proxy),
    Socks5(Socks5Proxy),
}

impl Proxy {
    pub fn peer(&self) -> &UpstreamAddr {
        match self {
            Proxy::Http(p) => p.peer(),
            Proxy::Socks4(p) => p.peer(),
            Proxy::Socks5(p) => p.peer(),
        }
    }

    fn url_peer(url: &Url, default_port: u16) -> Result<UpstreamAddr, ProxyParseError> {
        let host = url.host().ok_or(ProxyParseError::NoHostFound)?;
        let port = url.port().unwrap_or(default_port);
        Ok(UpstreamAddr::from_url_host_and_port(host.to_owned(), port))
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proxy::Http(p) => write!(f, "http://{}", p.peer()),
            Proxy::Socks4(p) if p.remote_resolve => write!(f, "socks4a://{}", p.peer()),
            Proxy::Socks4(p) => write!(f, "socks4://{}", p.peer()),
            Proxy::Socks5(p) => write!(f, "socks5://{}", p.peer()),
        }
    }
}

impl TryFrom<&Url> for Proxy {
    type Error = ProxyParseError;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        match value.scheme().to_ascii_lowercase().as_str() {
            "http" => {
                let p = HttpProxy::from_url_authority(value)?;
                Ok(Proxy::Http(p))
            }
            "socks4" => {
                let p = Socks4Proxy::from_url_authority(value, false)?;
                Ok(Proxy::Socks4(p))
            }
            "socks4a" => {
                let p = Socks4Proxy::from_url_authority(value, true)?;
                Ok(Proxy::Socks4(p))
            }
            "socks5" | "socks5h" => {
                let p = Socks5Proxy::from_url_authority(value)?;
                Ok(Proxy::Socks5(p))
            }
            _ => Err(ProxyParseError::InvalidScheme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{HttpAuth, SocksAuth};

    #[test]
    fn parse_http() {
        let url = Url::parse("http://u:p@10.0.0.1").unwrap();
        let Proxy::Http(p) = Proxy::try_from(&url).unwrap() else {
            panic!("not a http proxy");
        };
        assert_eq!(p.peer().to_string(), "10.0.0.1:8080");
        assert!(matches!(p.auth, HttpAuth::Basic(_, _)));
    }

    #[test]
    fn parse_socks() {
        let url = Url::parse("socks4a://proxy.test:1081").unwrap();
        let Proxy::Socks4(p) = Proxy::try_from(&url).unwrap() else {
            panic!("not a socks4 proxy");
        };
        assert!(p.remote_resolve);
        assert_eq!(p.peer().port(), 1081);

        let url = Url::parse("socks5h://proxy.test").unwrap();
        let proxy = Proxy::try_from(&url).unwrap();
        assert_eq!(proxy.to_string(), "socks5://proxy.test:1080");
        let Proxy::Socks5(p) = proxy else {
            panic!("not a socks5 proxy");
        };
        assert_eq!(p.auth, SocksAuth::None);
    }

    #[test]
    fn parse_invalid() {
        let url = Url::parse("ftp://proxy.test").unwrap();
        assert!(matches!(
            Proxy::try_from(&url),
            Err(ProxyParseError::InvalidScheme)
        ));
    }
}
