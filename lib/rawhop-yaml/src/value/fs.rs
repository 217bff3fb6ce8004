/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use yaml_rust::Yaml;

/// Get the path of an existing regular file
///
/// Relative paths are looked up in `lookup_dir` if set.
pub fn as_file_path(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let Yaml::String(s) = v else {
        return Err(anyhow!("yaml value type for 'file path' should be 'string'"));
    };
    let path = PathBuf::from(s);
    let path = match lookup_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    };
    if !path.is_file() {
        return Err(anyhow!("{} is not an existing regular file", path.display()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_lookup() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let v = Yaml::String("Cargo.toml".to_string());
        let p = as_file_path(&v, Some(dir)).unwrap();
        assert_eq!(p, dir.join("Cargo.toml"));

        let v = Yaml::String("src".to_string());
        assert!(as_file_path(&v, Some(dir)).is_err());

        let v = Yaml::Integer(1);
        assert!(as_file_path(&v, Some(dir)).is_err());
    }
}
