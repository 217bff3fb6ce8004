/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod version;
pub use version::TlsVersion;

mod revocation;
pub use revocation::CertRevocationMode;

mod verify;
pub use verify::{CertificateCheck, CertificateValidationCallback};

mod cipher;

mod client;
pub use client::{TlsClientConfig, TlsClientConfigBuilder, TlsConfigError};
