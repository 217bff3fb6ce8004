/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod debug;

mod config;
pub use config::TransportConfig;

mod error;
pub use error::{ConnectError, ProxyTunnelError, TransportError, TransportSendError};

mod connect;
pub use connect::{ConnectionProvider, ProxyConnector};

mod transport;
pub use transport::TransportClient;
