/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use rawhop_types::net::{CertRevocationMode, TlsClientConfigBuilder, TlsVersion};

pub fn as_tls_version(v: &Yaml) -> anyhow::Result<TlsVersion> {
    match v {
        Yaml::String(s) => TlsVersion::from_str(s),
        Yaml::Real(s) => TlsVersion::from_str(s),
        _ => Err(anyhow!(
            "yaml value type for tls version should be 'string' or 'real'"
        )),
    }
}

pub fn as_cert_revocation_mode(v: &Yaml) -> anyhow::Result<CertRevocationMode> {
    if let Yaml::String(s) = v {
        CertRevocationMode::from_str(s)
    } else {
        Err(anyhow!(
            "yaml value type for certificate revocation mode should be 'string'"
        ))
    }
}

/// Parse tls client settings
///
/// Relative file paths are looked up in `lookup_dir`.
pub fn as_tls_client_config_builder(
    v: &Yaml,
    lookup_dir: Option<&Path>,
) -> anyhow::Result<TlsClientConfigBuilder> {
    let Yaml::Hash(map) = v else {
        return Err(anyhow!(
            "yaml value type for 'tls client config' should be 'map'"
        ));
    };

    let mut builder = TlsClientConfigBuilder::default();
    crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
        "protocols" | "enabled_tls_versions" => {
            let protocols = crate::value::as_list(v, as_tls_version)
                .context(format!("invalid tls version list value for key {k}"))?;
            builder.set_protocols(protocols);
            Ok(())
        }
        "use_custom_cipher_suites" => {
            let enable = crate::value::as_bool(v)?;
            builder.set_use_custom_ciphers(enable);
            Ok(())
        }
        "cipher_suites" | "ciphers" => {
            let ciphers = crate::value::as_list(v, crate::value::as_string)
                .context(format!("invalid cipher suite list value for key {k}"))?;
            builder.set_use_custom_ciphers(true);
            builder.set_ciphers(ciphers);
            Ok(())
        }
        "disable_sni" => {
            if crate::value::as_bool(v)? {
                builder.set_disable_sni();
            }
            Ok(())
        }
        "no_default_ca_certs" => {
            if crate::value::as_bool(v)? {
                builder.set_no_default_ca_certificates();
            }
            Ok(())
        }
        "ca_cert_files" | "ca_cert_file" => {
            let paths = crate::value::as_list(v, |v| crate::value::as_file_path(v, lookup_dir))
                .context(format!("invalid ca certificate file list value for key {k}"))?;
            for path in paths {
                builder.load_ca_certificates(&path)?;
            }
            Ok(())
        }
        "certificate_revocation_mode" | "revocation_mode" => {
            let mode = as_cert_revocation_mode(v)
                .context(format!("invalid revocation mode value for key {k}"))?;
            builder.set_revocation_mode(mode);
            Ok(())
        }
        "crl_files" | "crl_file" => {
            let paths = crate::value::as_list(v, |v| crate::value::as_file_path(v, lookup_dir))
                .context(format!("invalid crl file list value for key {k}"))?;
            for path in paths {
                builder.load_crls(&path)?;
            }
            Ok(())
        }
        "handshake_timeout" => {
            let timeout = crate::humanize::as_duration(v)
                .context(format!("invalid humanize duration value for key {k}"))?;
            builder.set_handshake_timeout(timeout);
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k}")),
    })?;

    builder.check()?;
    Ok(builder)
}
