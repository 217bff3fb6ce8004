/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use rawhop_types::net::{Proxy, TlsClientConfigBuilder};

#[cfg(feature = "yaml")]
mod yaml;

const DEFAULT_MAX_REDIRECTS: usize = 8;
const DEFAULT_MAX_HEADER_SIZE: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct TransportConfig {
    pub allow_auto_redirect: bool,
    /// the max number of redirect hops followed in one send
    pub max_redirects: usize,
    pub read_response_body: bool,
    /// bound of each single read on the connection
    pub receive_timeout: Duration,
    /// bound of tcp connect plus proxy negotiation
    pub connect_timeout: Duration,
    pub max_header_size: usize,
    pub proxy: Option<Proxy>,
    pub tls: TlsClientConfigBuilder,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            allow_auto_redirect: true,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            read_response_body: true,
            receive_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            proxy: None,
            tls: TlsClientConfigBuilder::default(),
        }
    }
}
