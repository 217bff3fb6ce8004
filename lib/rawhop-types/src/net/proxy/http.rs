/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use url::Url;

use super::{Proxy, ProxyParseError};
use crate::net::{HttpAuth, UpstreamAddr};

const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug)]
pub struct HttpProxy {
    peer: UpstreamAddr,
    pub auth: HttpAuth,
}

impl HttpProxy {
    pub fn peer(&self) -> &UpstreamAddr {
        &self.peer
    }

    pub(super) fn from_url_authority(url: &Url) -> Result<Self, ProxyParseError> {
        let peer = Proxy::url_peer(url, DEFAULT_PORT)?;
        let auth = HttpAuth::try_from(url)?;
        Ok(HttpProxy { peer, auth })
    }
}
