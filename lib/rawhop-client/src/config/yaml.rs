/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::TransportConfig;

impl TransportConfig {
    /// Parse from a yaml map, relative file paths are looked up in `lookup_dir`
    pub fn parse_yaml(value: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = value {
            let mut config = TransportConfig::default();
            rawhop_yaml::foreach_kv(map, |k, v| match rawhop_yaml::key::normalize(k).as_str() {
                "allow_auto_redirect" => {
                    config.allow_auto_redirect = rawhop_yaml::value::as_bool(v)
                        .context(format!("invalid bool value for key {k}"))?;
                    Ok(())
                }
                "max_redirects" | "max_automatic_redirections" => {
                    config.max_redirects = rawhop_yaml::value::as_usize(v)
                        .context(format!("invalid usize value for key {k}"))?;
                    Ok(())
                }
                "read_response_body" => {
                    config.read_response_body = rawhop_yaml::value::as_bool(v)
                        .context(format!("invalid bool value for key {k}"))?;
                    Ok(())
                }
                "receive_timeout" | "read_timeout" => {
                    config.receive_timeout = rawhop_yaml::humanize::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    Ok(())
                }
                "connect_timeout" => {
                    config.connect_timeout = rawhop_yaml::humanize::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    Ok(())
                }
                "max_header_size" => {
                    config.max_header_size = rawhop_yaml::humanize::as_usize(v)
                        .context(format!("invalid humanize usize value for key {k}"))?;
                    Ok(())
                }
                "proxy" => {
                    if v.is_null() {
                        config.proxy = None;
                    } else {
                        let proxy = rawhop_yaml::value::as_proxy(v)
                            .context(format!("invalid proxy url value for key {k}"))?;
                        config.proxy = Some(proxy);
                    }
                    Ok(())
                }
                "tls" | "tls_client" => {
                    config.tls = rawhop_yaml::value::as_tls_client_config_builder(v, lookup_dir)
                        .context(format!("invalid tls client config value for key {k}"))?;
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            Ok(config)
        } else {
            Err(anyhow!("invalid yaml type"))
        }
    }
}
