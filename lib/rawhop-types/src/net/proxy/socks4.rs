/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use url::Url;

use super::{Proxy, ProxyParseError};
use crate::auth::{AuthParseError, Username};
use crate::net::UpstreamAddr;

const DEFAULT_PORT: u16 = 1080;

#[derive(Clone, Debug)]
pub struct Socks4Proxy {
    peer: UpstreamAddr,
    /// send the domain to the proxy (socks4a) instead of resolving it locally
    pub remote_resolve: bool,
    pub user_id: Username,
}

impl Socks4Proxy {
    pub fn peer(&self) -> &UpstreamAddr {
        &self.peer
    }

    pub(super) fn from_url_authority(
        url: &Url,
        remote_resolve: bool,
    ) -> Result<Self, ProxyParseError> {
        let peer = Proxy::url_peer(url, DEFAULT_PORT)?;
        let user_id = Username::from_encoded(url.username())
            .map_err(|_| AuthParseError::InvalidUsername)?;
        Ok(Socks4Proxy {
            peer,
            remote_resolve,
            user_id,
        })
    }
}
