/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use rustls::SupportedCipherSuite;
use rustls::crypto::ring::ALL_CIPHER_SUITES;

use super::TlsConfigError;

fn suite_name(suite: &SupportedCipherSuite) -> String {
    format!("{:?}", suite.suite())
}

fn find_cipher_suite(name: &str) -> Option<SupportedCipherSuite> {
    let want = name.trim().to_ascii_uppercase().replace('-', "_");
    // IANA names of TLS 1.3 suites carry no version tag
    let alt = want.strip_prefix("TLS_").map(|s| format!("TLS13_{s}"));
    ALL_CIPHER_SUITES
        .iter()
        .find(|s| {
            let n = suite_name(s);
            n == want || alt.as_deref() == Some(n.as_str())
        })
        .copied()
}

/// Map cipher suite names to the provider suites, keeping the configured order
pub(super) fn ordered_cipher_suites(
    names: &[String],
) -> Result<Vec<SupportedCipherSuite>, TlsConfigError> {
    let mut suites: Vec<SupportedCipherSuite> = Vec::with_capacity(names.len());
    for name in names {
        let suite = find_cipher_suite(name)
            .ok_or_else(|| TlsConfigError::UnknownCipherSuite(name.to_string()))?;
        if !suites.iter().any(|s| s.suite() == suite.suite()) {
            suites.push(suite);
        }
    }
    if suites.is_empty() {
        return Err(TlsConfigError::NoCipherSuite);
    }
    Ok(suites)
}
