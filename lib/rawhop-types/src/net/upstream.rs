/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::net::IpAddr;

use anyhow::anyhow;
use url::Url;

use super::Host;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct UpstreamAddr {
    host: Host,
    port: u16,
}

impl UpstreamAddr {
    pub fn new(host: Host, port: u16) -> Self {
        UpstreamAddr { host, port }
    }

    pub fn from_url_host_and_port(host: url::Host, port: u16) -> Self {
        UpstreamAddr {
            host: Host::from(host),
            port,
        }
    }

    /// Get the target address of a http or https url
    pub fn from_url(url: &Url) -> anyhow::Result<Self> {
        let host = url.host().ok_or_else(|| anyhow!("no host found in url"))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| anyhow!("no port found in url"))?;
        Ok(UpstreamAddr::new(Host::from(host), port))
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_host(&mut self, host: Host) {
        self.host = host;
    }

    pub fn host_eq(&self, other: &Self) -> bool {
        self.host.same_as(&other.host)
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Host::Ip(IpAddr::V6(ip6)) => write!(f, "[{ip6}]:{}", self.port),
            host => write!(f, "{host}:{}", self.port),
        }
    }
}
