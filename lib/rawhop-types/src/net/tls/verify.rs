/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::Arc;

use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::{DigitallySignedStruct, SignatureScheme};
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};

/// What the validation callback gets to see about the server certificate
pub struct CertificateCheck<'a> {
    pub server_name: &'a ServerName<'a>,
    pub end_entity: &'a CertificateDer<'a>,
    pub intermediates: &'a [CertificateDer<'a>],
    /// the error of the built-in webpki verification, if it failed
    pub verify_error: Option<&'a rustls::Error>,
}

/// Return true to accept the server certificate
pub type CertificateValidationCallback = Arc<dyn Fn(&CertificateCheck<'_>) -> bool + Send + Sync>;

pub(super) struct CallbackServerVerifier {
    inner: Arc<WebPkiServerVerifier>,
    callback: CertificateValidationCallback,
}

impl CallbackServerVerifier {
    pub(super) fn new(
        inner: Arc<WebPkiServerVerifier>,
        callback: CertificateValidationCallback,
    ) -> Self {
        CallbackServerVerifier { inner, callback }
    }
}

impl fmt::Debug for CallbackServerVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackServerVerifier")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl ServerCertVerifier for CallbackServerVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        let verified = self.inner.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            ocsp_response,
            now,
        );
        let check = CertificateCheck {
            server_name,
            end_entity,
            intermediates,
            verify_error: verified.as_ref().err(),
        };
        if (self.callback)(&check) {
            log::debug!("server certificate for {server_name:?} accepted by callback");
            return Ok(ServerCertVerified::assertion());
        }
        match verified {
            Ok(_) => Err(rustls::Error::General(
                "certificate rejected by validation callback".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}
