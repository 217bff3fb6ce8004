/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;

use rawhop_io_ext::BoxAsyncStream;
use rawhop_types::net::UpstreamAddr;

use crate::ConnectError;

mod proxy;
pub use proxy::ProxyConnector;

mod tls;

#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Open a new connection to `upstream`, wrapped in tls if `secure` is set
    async fn new_connection(
        &self,
        upstream: &UpstreamAddr,
        secure: bool,
    ) -> Result<BoxAsyncStream, ConnectError>;
}
