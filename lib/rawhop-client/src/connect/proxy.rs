/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;

use rawhop_io_ext::BoxAsyncStream;
use rawhop_types::net::{Host, Proxy, TlsClientConfig, TlsConfigError, UpstreamAddr};

use super::ConnectionProvider;
use crate::{ConnectError, ProxyTunnelError, TransportConfig};

/// Connect to the upstream directly or through the configured proxy
pub struct ProxyConnector {
    proxy: Option<Proxy>,
    connect_timeout: Duration,
    max_header_size: usize,
    tls_client: TlsClientConfig,
}

impl ProxyConnector {
    pub fn new(config: &TransportConfig) -> Result<Self, TlsConfigError> {
        let mut tls_builder = config.tls.clone();
        tls_builder.check()?;
        let tls_client = tls_builder.build()?;
        Ok(ProxyConnector {
            proxy: config.proxy.clone(),
            connect_timeout: config.connect_timeout,
            max_header_size: config.max_header_size,
            tls_client,
        })
    }

    async fn open_tunnel(&self, upstream: &UpstreamAddr) -> Result<TcpStream, ConnectError> {
        let Some(proxy) = &self.proxy else {
            return tcp_connect_to(upstream).await;
        };

        let mut stream = tcp_connect_to(proxy.peer()).await?;
        self.negotiate(proxy, &mut stream, upstream)
            .await
            .map_err(|e| ConnectError::ProxyTunnelFailed(proxy.to_string(), e))?;
        log::debug!("tunnel to {upstream} established via proxy {proxy}");
        Ok(stream)
    }

    async fn negotiate(
        &self,
        proxy: &Proxy,
        stream: &mut TcpStream,
        upstream: &UpstreamAddr,
    ) -> Result<(), ProxyTunnelError> {
        match proxy {
            Proxy::Http(p) => {
                rawhop_http::connect::http_connect_to(
                    stream,
                    &p.auth,
                    upstream,
                    self.max_header_size,
                )
                .await?;
            }
            Proxy::Socks4(p) => {
                let target = if p.remote_resolve {
                    upstream.clone()
                } else {
                    resolve_ipv4(upstream).await?
                };
                rawhop_socks::v4::socks4_connect_to(stream, p.user_id.as_original(), &target)
                    .await?;
            }
            Proxy::Socks5(p) => {
                let bind = rawhop_socks::v5::socks5_connect_to(stream, &p.auth, upstream).await?;
                log::trace!("socks5 proxy {proxy} bound {bind} for {upstream}");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectionProvider for ProxyConnector {
    async fn new_connection(
        &self,
        upstream: &UpstreamAddr,
        secure: bool,
    ) -> Result<BoxAsyncStream, ConnectError> {
        let stream = tokio::time::timeout(self.connect_timeout, self.open_tunnel(upstream))
            .await
            .map_err(|_| ConnectError::Timeout(upstream.clone()))??;

        if secure {
            let tls_stream = super::tls::tls_connect(&self.tls_client, upstream, stream).await?;
            Ok(Box::new(tls_stream))
        } else {
            Ok(Box::new(stream))
        }
    }
}

async fn tcp_connect_to(peer: &UpstreamAddr) -> Result<TcpStream, ConnectError> {
    let r = match peer.host() {
        Host::Ip(ip) => TcpStream::connect(SocketAddr::new(*ip, peer.port())).await,
        Host::Domain(domain) => TcpStream::connect((domain.as_str(), peer.port())).await,
    };
    let stream = r.map_err(|e| ConnectError::ConnectFailed(peer.clone(), e))?;
    log::debug!("tcp connected to {peer}");
    Ok(stream)
}

/// socks4 without the 4a extension only accepts ipv4 targets
async fn resolve_ipv4(upstream: &UpstreamAddr) -> Result<UpstreamAddr, ProxyTunnelError> {
    let Host::Domain(domain) = upstream.host() else {
        return Ok(upstream.clone());
    };
    let mut addrs = tokio::net::lookup_host((domain.as_str(), upstream.port()))
        .await
        .map_err(|e| ProxyTunnelError::ResolveFailed(domain.clone(), e))?;
    addrs
        .find(|a| a.is_ipv4())
        .map(|a| UpstreamAddr::new(Host::Ip(a.ip()), upstream.port()))
        .ok_or_else(|| ProxyTunnelError::NoIpv4AddressFound(domain.clone()))
}
