/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

pub fn as_bool(v: &Yaml) -> anyhow::Result<bool> {
    match v {
        Yaml::String(s) => match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(true),
            "off" | "false" | "no" | "0" => Ok(false),
            _ => Err(anyhow!("invalid yaml string value for 'bool': {s}")),
        },
        Yaml::Boolean(value) => Ok(*value),
        Yaml::Integer(i) => Ok(*i != 0),
        _ => Err(anyhow!(
            "yaml value type for 'bool' should be 'boolean' / 'string' / 'integer'"
        )),
    }
}

pub fn as_u32(v: &Yaml) -> anyhow::Result<u32> {
    match v {
        Yaml::String(s) => Ok(u32::from_str(s)?),
        Yaml::Integer(i) => Ok(u32::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'u32' should be 'string' or 'integer'"
        )),
    }
}

pub fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::String(s) => Ok(usize::from_str(s)?),
        Yaml::Integer(i) => Ok(usize::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'usize' should be 'string' or 'integer'"
        )),
    }
}

pub fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real'"
        )),
    }
}

/// Parse a single value or an array of values
pub fn as_list<T, F>(v: &Yaml, convert: F) -> anyhow::Result<Vec<T>>
where
    F: Fn(&Yaml) -> anyhow::Result<T>,
{
    let mut vec = Vec::new();
    match v {
        Yaml::Array(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let node = convert(v).context(format!("invalid value for list element #{i}"))?;
                vec.push(node);
            }
        }
        _ => {
            let node = convert(v)?;
            vec.push(node);
        }
    }
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_bool() {
        assert!(as_bool(&Yaml::String("On".to_string())).unwrap());
        assert!(!as_bool(&Yaml::String("no".to_string())).unwrap());
        assert!(as_bool(&Yaml::Boolean(true)).unwrap());
        assert!(!as_bool(&Yaml::Integer(0)).unwrap());
        assert!(as_bool(&Yaml::String("maybe".to_string())).is_err());
        assert!(as_bool(&Yaml::Real("1.0".to_string())).is_err());
    }

    #[test]
    fn t_integer() {
        assert_eq!(as_u32(&Yaml::Integer(8)).unwrap(), 8);
        assert_eq!(as_u32(&Yaml::String("16".to_string())).unwrap(), 16);
        assert!(as_u32(&Yaml::Integer(-1)).is_err());
        assert_eq!(as_usize(&Yaml::Integer(4096)).unwrap(), 4096);
        assert!(as_usize(&Yaml::Boolean(false)).is_err());
    }

    #[test]
    fn t_string() {
        assert_eq!(as_string(&Yaml::String("abc".to_string())).unwrap(), "abc");
        assert_eq!(as_string(&Yaml::Integer(12)).unwrap(), "12");
        assert!(as_string(&Yaml::Null).is_err());
    }

    #[test]
    fn t_list() {
        let v = yaml_doc!("[a, b, c]");
        assert_eq!(
            as_list(&v, as_string).unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );

        let v = Yaml::String("single".to_string());
        assert_eq!(as_list(&v, as_string).unwrap(), vec!["single".to_string()]);

        let v = yaml_doc!("[1, ~]");
        assert!(as_list(&v, as_string).is_err());
    }
}
