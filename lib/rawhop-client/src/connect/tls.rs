/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use rawhop_types::net::{TlsClientConfig, UpstreamAddr};

use crate::ConnectError;

pub(super) async fn tls_connect<S>(
    tls_client: &TlsClientConfig,
    upstream: &UpstreamAddr,
    stream: S,
) -> Result<TlsStream<S>, ConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let tls_name = upstream
        .host()
        .to_server_name()
        .map_err(|_| ConnectError::InvalidTlsServerName(upstream.host().to_string()))?;

    let tls_connector = TlsConnector::from(tls_client.driver.clone());
    match tokio::time::timeout(
        tls_client.handshake_timeout,
        tls_connector.connect(tls_name, stream),
    )
    .await
    {
        Ok(Ok(tls_stream)) => {
            let (_, session) = tls_stream.get_ref();
            log::debug!(
                "tls established with {upstream}: {:?} {:?}",
                session.protocol_version(),
                session.negotiated_cipher_suite().map(|s| s.suite())
            );
            Ok(tls_stream)
        }
        Ok(Err(e)) => Err(ConnectError::SecureConnectFailed(upstream.clone(), e)),
        Err(_) => Err(ConnectError::SecureConnectFailed(
            upstream.clone(),
            io::Error::new(io::ErrorKind::TimedOut, "tls handshake timed out"),
        )),
    }
}
