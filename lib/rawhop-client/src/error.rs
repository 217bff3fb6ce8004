/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use bytes::Bytes;
use thiserror::Error;

use rawhop_http::connect::HttpConnectError;
use rawhop_http::{HttpRequestSerializeError, HttpResponseParseError};
use rawhop_socks::SocksConnectError;
use rawhop_types::net::UpstreamAddr;

#[derive(Debug, Error)]
pub enum ProxyTunnelError {
    #[error("http connect failed: {0}")]
    HttpConnectFailed(#[from] HttpConnectError),
    #[error("socks connect failed: {0}")]
    SocksConnectFailed(#[from] SocksConnectError),
    #[error("failed to resolve {0}: {1:?}")]
    ResolveFailed(String, io::Error),
    #[error("no ipv4 address found for {0}")]
    NoIpv4AddressFound(String),
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to connect to {0}: {1:?}")]
    ConnectFailed(UpstreamAddr, io::Error),
    #[error("tunnel via proxy {0} failed: {1}")]
    ProxyTunnelFailed(String, ProxyTunnelError),
    #[error("invalid tls server name {0}")]
    InvalidTlsServerName(String),
    #[error("tls handshake with {0} failed: {1:?}")]
    SecureConnectFailed(UpstreamAddr, io::Error),
    #[error("timed out to connect to {0}")]
    Timeout(UpstreamAddr),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    #[error("serialize request failed: {0}")]
    SerializeFailed(#[from] HttpRequestSerializeError),
    #[error("connect failed: {0}")]
    ConnectFailed(#[from] ConnectError),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] HttpResponseParseError),
    #[error("too many redirects, the limit is {0}")]
    TooManyRedirects(usize),
    #[error("no Location header in redirect response, disable auto redirect to get the response")]
    MissingLocation,
    #[error("invalid redirect location {0}: {1}")]
    InvalidRedirectLocation(String, url::ParseError),
    #[error("canceled")]
    Canceled,
    #[error("redirect hop #{hop}: {source}")]
    Redirect {
        hop: usize,
        source: Box<TransportError>,
    },
}

impl TransportError {
    /// The error with redirect hop context removed
    pub fn root(&self) -> &TransportError {
        match self {
            TransportError::Redirect { source, .. } => source.root(),
            e => e,
        }
    }

    pub(crate) fn at_hop(self, hop: usize) -> Self {
        if hop == 0 {
            self
        } else {
            TransportError::Redirect {
                hop,
                source: Box::new(self),
            }
        }
    }
}

/// A failed send, with all the raw buffers sent before the failure
#[derive(Debug, Error)]
#[error("{error}")]
pub struct TransportSendError {
    #[source]
    pub error: TransportError,
    pub sent: Vec<Bytes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_context() {
        let e = TransportError::MissingLocation.at_hop(0);
        assert!(matches!(e, TransportError::MissingLocation));

        let e = TransportError::Canceled.at_hop(2);
        assert_eq!(e.to_string(), "redirect hop #2: canceled");
        assert!(matches!(e.root(), TransportError::Canceled));
    }
}
