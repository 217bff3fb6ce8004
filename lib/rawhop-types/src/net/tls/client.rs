/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rustls::client::{VerifierBuilderError, WebPkiServerVerifier};
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, CertificateRevocationListDer};
use thiserror::Error;

use super::verify::CallbackServerVerifier;
use super::{CertRevocationMode, CertificateValidationCallback, TlsVersion, cipher};

const MINIMAL_HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(100);
const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TlsConfigError {
    #[error("unknown cipher suite {0}")]
    UnknownCipherSuite(String),
    #[error("no cipher suite is enabled")]
    NoCipherSuite,
    #[error("invalid ca certificate: {0}")]
    InvalidCaCertificate(rustls::Error),
    #[error("failed to load pem file {0}: {1}")]
    LoadPemFailed(String, rustls_pki_types::pem::Error),
    #[error("unable to build certificate verifier: {0}")]
    BuildVerifierFailed(#[from] VerifierBuilderError),
    #[error("unable to build client config: {0}")]
    BuildConfigFailed(rustls::Error),
}

#[derive(Clone)]
pub struct TlsClientConfig {
    pub driver: Arc<ClientConfig>,
    pub handshake_timeout: Duration,
}

impl fmt::Debug for TlsClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsClientConfig")
            .field("handshake_timeout", &self.handshake_timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct TlsClientConfigBuilder {
    protocols: Vec<TlsVersion>,
    use_custom_ciphers: bool,
    ciphers: Vec<String>,
    disable_sni: bool,
    ca_certs: Vec<CertificateDer<'static>>,
    no_default_ca_certs: bool,
    revocation_mode: CertRevocationMode,
    crls: Vec<CertificateRevocationListDer<'static>>,
    handshake_timeout: Duration,
    validation_callback: Option<CertificateValidationCallback>,
}

impl Default for TlsClientConfigBuilder {
    fn default() -> Self {
        TlsClientConfigBuilder {
            protocols: Vec::new(),
            use_custom_ciphers: false,
            ciphers: Vec::new(),
            disable_sni: false,
            ca_certs: Vec::new(),
            no_default_ca_certs: false,
            revocation_mode: CertRevocationMode::NoCheck,
            crls: Vec::new(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            validation_callback: None,
        }
    }
}

impl fmt::Debug for TlsClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsClientConfigBuilder")
            .field("protocols", &self.protocols)
            .field("use_custom_ciphers", &self.use_custom_ciphers)
            .field("ciphers", &self.ciphers)
            .field("disable_sni", &self.disable_sni)
            .field("ca_certs", &self.ca_certs.len())
            .field("no_default_ca_certs", &self.no_default_ca_certs)
            .field("revocation_mode", &self.revocation_mode)
            .field("crls", &self.crls.len())
            .field("handshake_timeout", &self.handshake_timeout)
            .field("validation_callback", &self.validation_callback.is_some())
            .finish()
    }
}

impl TlsClientConfigBuilder {
    pub fn check(&mut self) -> Result<(), TlsConfigError> {
        if self.use_custom_ciphers && self.ciphers.is_empty() {
            return Err(TlsConfigError::NoCipherSuite);
        }
        if self.handshake_timeout < MINIMAL_HANDSHAKE_TIMEOUT {
            self.handshake_timeout = MINIMAL_HANDSHAKE_TIMEOUT;
        }
        Ok(())
    }

    pub fn set_protocols(&mut self, protocols: Vec<TlsVersion>) {
        self.protocols = protocols;
    }

    pub fn set_use_custom_ciphers(&mut self, enable: bool) {
        self.use_custom_ciphers = enable;
    }

    /// The order of the list is the order sent in the ClientHello
    pub fn set_ciphers(&mut self, ciphers: Vec<String>) {
        self.ciphers = ciphers;
    }

    pub fn ciphers(&self) -> &[String] {
        &self.ciphers
    }

    pub fn set_disable_sni(&mut self) {
        self.disable_sni = true;
    }

    pub fn set_no_default_ca_certificates(&mut self) {
        self.no_default_ca_certs = true;
    }

    pub fn set_ca_certificates(&mut self, certs: Vec<CertificateDer<'static>>) {
        self.ca_certs = certs;
    }

    pub fn load_ca_certificates(&mut self, path: &Path) -> Result<(), TlsConfigError> {
        let certs = CertificateDer::pem_file_iter(path)
            .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
            .map_err(|e| TlsConfigError::LoadPemFailed(path.display().to_string(), e))?;
        self.ca_certs.extend(certs);
        Ok(())
    }

    pub fn set_revocation_mode(&mut self, mode: CertRevocationMode) {
        self.revocation_mode = mode;
    }

    pub fn load_crls(&mut self, path: &Path) -> Result<(), TlsConfigError> {
        let crls = CertificateRevocationListDer::pem_file_iter(path)
            .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
            .map_err(|e| TlsConfigError::LoadPemFailed(path.display().to_string(), e))?;
        self.crls.extend(crls);
        Ok(())
    }

    pub fn set_handshake_timeout(&mut self, timeout: Duration) {
        self.handshake_timeout = timeout;
    }

    pub fn set_validation_callback(&mut self, callback: CertificateValidationCallback) {
        self.validation_callback = Some(callback);
    }

    fn build_provider(&self) -> Result<CryptoProvider, TlsConfigError> {
        let mut provider = rustls::crypto::ring::default_provider();
        if self.use_custom_ciphers {
            provider.cipher_suites = cipher::ordered_cipher_suites(&self.ciphers)?;
        }
        Ok(provider)
    }

    fn build_root_store(&self) -> Result<RootCertStore, TlsConfigError> {
        let mut root_store = RootCertStore::empty();
        if !self.no_default_ca_certs {
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        }
        for cert in &self.ca_certs {
            root_store
                .add(cert.clone())
                .map_err(TlsConfigError::InvalidCaCertificate)?;
        }
        Ok(root_store)
    }

    fn build_verifier(
        &self,
        provider: Arc<CryptoProvider>,
    ) -> Result<Arc<WebPkiServerVerifier>, TlsConfigError> {
        let roots = Arc::new(self.build_root_store()?);
        let mut builder = WebPkiServerVerifier::builder_with_provider(roots, provider);
        match self.revocation_mode {
            CertRevocationMode::NoCheck => {}
            CertRevocationMode::EndEntity => {
                builder = builder
                    .with_crls(self.crls.iter().cloned())
                    .only_check_end_entity_revocation()
                    .allow_unknown_revocation_status();
            }
            CertRevocationMode::FullChain => {
                builder = builder
                    .with_crls(self.crls.iter().cloned())
                    .allow_unknown_revocation_status();
            }
        }
        Ok(builder.build()?)
    }

    pub fn build(&self) -> Result<TlsClientConfig, TlsConfigError> {
        let provider = Arc::new(self.build_provider()?);

        let versions: Vec<&'static rustls::SupportedProtocolVersion> = if self.protocols.is_empty()
        {
            vec![&rustls::version::TLS13, &rustls::version::TLS12]
        } else {
            self.protocols.iter().map(|v| v.rustls_version()).collect()
        };

        let verifier = self.build_verifier(provider.clone())?;
        let builder = ClientConfig::builder_with_provider(provider)
            .with_protocol_versions(&versions)
            .map_err(TlsConfigError::BuildConfigFailed)?;
        let mut config = match &self.validation_callback {
            Some(callback) => builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(CallbackServerVerifier::new(
                    verifier,
                    callback.clone(),
                )))
                .with_no_client_auth(),
            None => builder.with_webpki_verifier(verifier).with_no_client_auth(),
        };
        config.enable_sni = !self.disable_sni;

        Ok(TlsClientConfig {
            driver: Arc::new(config),
            handshake_timeout: self.handshake_timeout,
        })
    }
}
