/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use url::Url;

use super::{Proxy, ProxyParseError};
use crate::net::{SocksAuth, UpstreamAddr};

const DEFAULT_PORT: u16 = 1080;

#[derive(Clone, Debug)]
pub struct Socks5Proxy {
    peer: UpstreamAddr,
    pub auth: SocksAuth,
}

impl Socks5Proxy {
    pub fn peer(&self) -> &UpstreamAddr {
        &self.peer
    }

    pub(super) fn from_url_authority(url: &Url) -> Result<Self, ProxyParseError> {
        let peer = Proxy::url_peer(url, DEFAULT_PORT)?;
        let auth = SocksAuth::try_from(url)?;
        Ok(Socks5Proxy { peer, auth })
    }
}
