/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use anyhow::anyhow;
use rustls_pki_types::{InvalidDnsNameError, ServerName};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Host {
    Ip(IpAddr),
    Domain(String),
}

impl Host {
    fn from_maybe_mapped_ip6(ip6: Ipv6Addr) -> Self {
        if let Some(ip4) = ip6.to_ipv4_mapped() {
            Host::Ip(IpAddr::V4(ip4))
        } else {
            Host::Ip(IpAddr::V6(ip6))
        }
    }

    fn from_domain_str(domain: &str) -> anyhow::Result<Self> {
        let domain = idna::domain_to_ascii(domain).map_err(|e| anyhow!("invalid domain: {e}"))?;
        Ok(Host::Domain(domain))
    }

    /// Case insensitive compare, as used for redirect target checks
    pub fn same_as(&self, other: &Host) -> bool {
        match (self, other) {
            (Host::Ip(a), Host::Ip(b)) => a == b,
            (Host::Domain(a), Host::Domain(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    pub fn to_server_name(&self) -> Result<ServerName<'static>, InvalidDnsNameError> {
        match self {
            Host::Ip(ip) => Ok(ServerName::IpAddress((*ip).into())),
            Host::Domain(domain) => ServerName::try_from(domain.clone()),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ip(ip) => write!(f, "{ip}"),
            Host::Domain(domain) => write!(f, "{domain}"),
        }
    }
}

impl From<url::Host> for Host {
    fn from(v: url::Host) -> Self {
        match v {
            url::Host::Ipv4(ip4) => Host::Ip(IpAddr::V4(ip4)),
            url::Host::Ipv6(ip6) => Host::from_maybe_mapped_ip6(ip6),
            url::Host::Domain(domain) => Host::Domain(domain),
        }
    }
}

impl From<url::Host<&str>> for Host {
    fn from(v: url::Host<&str>) -> Self {
        Host::from(v.to_owned())
    }
}

impl FromStr for Host {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(anyhow!("empty string"));
        }
        match s.as_bytes()[0] {
            b'[' => {
                let pos_last = s.len() - 1;
                if s.as_bytes()[pos_last] == b']'
                    && let Ok(ip6) = Ipv6Addr::from_str(&s[1..pos_last])
                {
                    return Ok(Host::from_maybe_mapped_ip6(ip6));
                }
                return Err(anyhow!("invalid ipv6 ip in squared brackets"));
            }
            b':' => {
                return if let Ok(ip6) = Ipv6Addr::from_str(s) {
                    Ok(Host::from_maybe_mapped_ip6(ip6))
                } else {
                    Err(anyhow!("invalid ipv6 ip"))
                };
            }
            b'0'..=b'9' => {
                if let Ok(ip) = IpAddr::from_str(s) {
                    return match ip {
                        IpAddr::V4(_) => Ok(Host::Ip(ip)),
                        IpAddr::V6(ip6) => Ok(Host::from_maybe_mapped_ip6(ip6)),
                    };
                }
            }
            b'a'..=b'f' | b'A'..=b'F' => {
                if let Ok(ip6) = Ipv6Addr::from_str(s) {
                    // won't be ipv4 mapped
                    return Ok(Host::Ip(IpAddr::V6(ip6)));
                }
            }
            _ => {}
        }

        Host::from_domain_str(s)
    }
}
