/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use async_recursion::async_recursion;
use bytes::Bytes;
use http::{Method, header};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use rawhop_http::{
    HttpRequest, HttpRequestSegments, HttpRequestSerializer, HttpResponse, HttpResponseParser,
};
use rawhop_io_ext::StreamBufReader;
use rawhop_types::net::{TlsConfigError, UpstreamAddr};

use crate::{
    ConnectionProvider, ProxyConnector, TransportConfig, TransportError, TransportSendError,
};

pub struct TransportClient<P = ProxyConnector> {
    config: TransportConfig,
    provider: P,
    parser: HttpResponseParser,
}

impl TransportClient<ProxyConnector> {
    pub fn new(config: TransportConfig) -> Result<Self, TlsConfigError> {
        let provider = ProxyConnector::new(&config)?;
        Ok(TransportClient::with_provider(config, provider))
    }
}

impl<P: ConnectionProvider> TransportClient<P> {
    pub fn with_provider(config: TransportConfig, provider: P) -> Self {
        let mut parser = HttpResponseParser::new(config.max_header_size);
        parser.set_read_body(config.read_response_body);
        TransportClient {
            config,
            provider,
            parser,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Send the request, following redirects if enabled.
    ///
    /// The raw buffers of all the attempts are returned along with the
    /// response, or attached to the error.
    pub async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<(HttpResponse, Vec<Bytes>), TransportSendError> {
        let mut sent = Vec::new();
        match self.send_hop(request, 0, cancel, &mut sent).await {
            Ok(rsp) => Ok((rsp, sent)),
            Err(error) => Err(TransportSendError { error, sent }),
        }
    }

    #[async_recursion]
    async fn send_hop(
        &self,
        request: HttpRequest,
        hop: usize,
        cancel: &CancellationToken,
        sent: &mut Vec<Bytes>,
    ) -> Result<HttpResponse, TransportError> {
        if hop > self.config.max_redirects {
            return Err(TransportError::TooManyRedirects(self.config.max_redirects));
        }

        let rsp = self
            .exchange(request, cancel, sent)
            .await
            .map_err(|e| e.at_hop(hop))?;
        if !self.config.allow_auto_redirect || !rsp.is_redirect() {
            return Ok(rsp);
        }

        let code = rsp.code;
        let next = redirect_request(rsp).map_err(|e| e.at_hop(hop))?;
        log::debug!(
            "follow redirect #{} ({code}) to {} {}",
            hop + 1,
            next.method,
            next.uri
        );
        self.send_hop(next, hop + 1, cancel, sent).await
    }

    /// One request and response on a new connection
    async fn exchange(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
        sent: &mut Vec<Bytes>,
    ) -> Result<HttpResponse, TransportError> {
        if !matches!(request.uri.scheme(), "http" | "https") {
            return Err(TransportError::InvalidRequest("unsupported url scheme"));
        }
        let upstream = UpstreamAddr::from_url(&request.uri)
            .map_err(|_| TransportError::InvalidRequest("no valid host in url"))?;

        let segments = HttpRequestSerializer::new(&request).serialize()?;
        sent.extend(segments.iter().cloned());

        let stream = tokio::select! {
            biased;

            _ = cancel.cancelled() => return Err(TransportError::Canceled),
            r = self.provider.new_connection(&upstream, request.is_https()) => r?,
        };

        let mut reader = StreamBufReader::new(stream);
        tokio::select! {
            biased;

            _ = cancel.cancelled() => return Err(TransportError::Canceled),
            r = write_segments(reader.get_mut(), &segments) => r.map_err(TransportError::WriteFailed)?,
        }

        reader.set_recv_timeout(self.config.receive_timeout);
        let rsp = tokio::select! {
            biased;

            _ = cancel.cancelled() => return Err(TransportError::Canceled),
            r = self.parser.parse(&mut reader, request) => r?,
        };
        #[cfg(feature = "log-raw-io")]
        crate::debug::log_rsp_head(&rsp);
        log::debug!("{} {} from {upstream}", rsp.code, rsp.reason);
        Ok(rsp)
    }
}

async fn write_segments<W>(writer: &mut W, segments: &HttpRequestSegments) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for buf in segments.iter() {
        #[cfg(feature = "log-raw-io")]
        crate::debug::log_sent(buf);

        writer.write_all(buf).await?;
    }
    writer.flush().await
}

/// Turn the request of a redirect response into the request of the next hop
fn redirect_request(rsp: HttpResponse) -> Result<HttpRequest, TransportError> {
    let location = rsp
        .location()
        .ok_or(TransportError::MissingLocation)?
        .to_string();
    let code = rsp.code;
    let mut request = rsp.request;

    let target = request
        .uri
        .join(&location)
        .map_err(|e| TransportError::InvalidRedirectLocation(location, e))?;

    if code != 307 {
        request.method = Method::GET;
        request.content = None;
    }

    if let (Some(from), Some(to)) = (request.uri.host_str(), target.host_str())
        && !from.eq_ignore_ascii_case(to)
    {
        // cookies sent to the old uri follow the redirect
        request.cookies.copy_to_host(&request.uri, to);
        request.headers.remove(&header::HOST);
        request.headers.remove(&header::ORIGIN);
    }

    request.uri = target;
    Ok(request)
}
