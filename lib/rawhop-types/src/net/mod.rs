/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod host;
pub use host::Host;

mod upstream;
pub use upstream::UpstreamAddr;

mod auth;
pub use auth::{HttpAuth, SocksAuth};

mod proxy;
pub use proxy::{HttpProxy, Proxy, ProxyParseError, Socks4Proxy, Socks5Proxy};

mod http;
pub use self::http::{HttpHeaderEntry, HttpHeaderMap};

mod tls;
pub use tls::{
    CertRevocationMode, CertificateCheck, CertificateValidationCallback, TlsClientConfig,
    TlsClientConfigBuilder, TlsConfigError, TlsVersion,
};
