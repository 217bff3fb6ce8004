/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;

/// Which certificates of the server chain are checked against the configured CRLs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CertRevocationMode {
    #[default]
    NoCheck,
    EndEntity,
    FullChain,
}

impl FromStr for CertRevocationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "no_check" | "nocheck" | "none" => Ok(CertRevocationMode::NoCheck),
            "end_entity" | "endentity" | "leaf" => Ok(CertRevocationMode::EndEntity),
            "full_chain" | "fullchain" | "online" | "offline" => {
                Ok(CertRevocationMode::FullChain)
            }
            _ => Err(anyhow!("unknown certificate revocation mode {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(
            CertRevocationMode::from_str("NoCheck").unwrap(),
            CertRevocationMode::NoCheck
        );
        assert_eq!(
            CertRevocationMode::from_str("end-entity").unwrap(),
            CertRevocationMode::EndEntity
        );
        assert_eq!(
            CertRevocationMode::from_str("Online").unwrap(),
            CertRevocationMode::FullChain
        );
        assert!(CertRevocationMode::from_str("sometimes").is_err());
    }
}
