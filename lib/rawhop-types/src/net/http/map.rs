/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use http::HeaderName;
use http::header::InvalidHeaderName;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// All values of one header, with the name spelled as first seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHeaderEntry {
    original_name: String,
    values: SmallVec<[String; 1]>,
}

impl HttpHeaderEntry {
    fn new(original_name: &str) -> Self {
        HttpHeaderEntry {
            original_name: original_name.to_string(),
            values: SmallVec::new(),
        }
    }

    #[inline]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[inline]
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(|s| s.as_str())
    }

    /// Join all values into a single header line value
    pub fn join(&self, sep: &str) -> String {
        self.values.join(sep)
    }
}

/// Ordered multi-map of headers, keyed case-insensitively
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HttpHeaderMap {
    inner: IndexMap<HeaderName, HttpHeaderEntry>,
}

impl HttpHeaderMap {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of distinct header names
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn append(&mut self, name: HeaderName, original_name: &str, value: String) {
        self.inner
            .entry(name)
            .or_insert_with(|| HttpHeaderEntry::new(original_name))
            .values
            .push(value);
    }

    pub fn append_str(&mut self, name: &str, value: &str) -> Result<(), InvalidHeaderName> {
        let header_name = HeaderName::from_bytes(name.as_bytes())?;
        self.append(header_name, name, value.to_string());
        Ok(())
    }

    /// Replace all existing values, keeping the position of the name
    pub fn insert_str(&mut self, name: &str, value: &str) -> Result<(), InvalidHeaderName> {
        let header_name = HeaderName::from_bytes(name.as_bytes())?;
        let entry = self
            .inner
            .entry(header_name)
            .or_insert_with(|| HttpHeaderEntry::new(name));
        entry.values.clear();
        entry.values.push(value.to_string());
        Ok(())
    }

    #[inline]
    pub fn remove(&mut self, name: &HeaderName) -> Option<HttpHeaderEntry> {
        self.inner.shift_remove(name)
    }

    #[inline]
    pub fn contains_key(&self, name: &HeaderName) -> bool {
        self.inner.contains_key(name)
    }

    #[inline]
    pub fn get(&self, name: &HeaderName) -> Option<&HttpHeaderEntry> {
        self.inner.get(name)
    }

    pub fn get_first(&self, name: &HeaderName) -> Option<&str> {
        self.inner.get(name).and_then(|e| e.first())
    }

    pub fn get_str(&self, name: &str) -> Option<&HttpHeaderEntry> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).ok()?;
        self.inner.get(&header_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HttpHeaderEntry)> {
        self.inner.iter()
    }

    pub fn for_each_value<F>(&self, mut call: F)
    where
        F: FnMut(&HeaderName, &str, &str),
    {
        for (name, entry) in &self.inner {
            for v in &entry.values {
                call(name, entry.original_name(), v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn keep_order() {
        let mut map = HttpHeaderMap::default();
        map.append_str("X-B", "1").unwrap();
        map.append_str("accept", "text/html").unwrap();
        map.append_str("Accept", "*/*").unwrap();
        map.append_str("X-A", "2").unwrap();

        let names: Vec<&str> = map.iter().map(|(_, e)| e.original_name()).collect();
        assert_eq!(names, vec!["X-B", "accept", "X-A"]);
        let accept = map.get(&header::ACCEPT).unwrap();
        assert_eq!(accept.values(), &["text/html", "*/*"]);
        assert_eq!(accept.join(", "), "text/html, */*");
    }

    #[test]
    fn insert_and_remove() {
        let mut map = HttpHeaderMap::default();
        map.append_str("Host", "a.test").unwrap();
        map.append_str("Origin", "http://a.test").unwrap();
        map.insert_str("host", "b.test").unwrap();
        assert_eq!(map.get_first(&header::HOST), Some("b.test"));
        assert_eq!(map.get(&header::HOST).unwrap().original_name(), "Host");

        assert!(map.remove(&header::ORIGIN).is_some());
        assert!(!map.contains_key(&header::ORIGIN));
        assert_eq!(map.len(), 1);
        assert!(map.append_str("bad name", "x").is_err());
    }

    #[test]
    fn for_each_value() {
        let mut map = HttpHeaderMap::default();
        map.append_str("A", "1").unwrap();
        map.append_str("a", "2").unwrap();
        let mut seen = Vec::new();
        map.for_each_value(|_, original, v| seen.push(format!("{original}={v}")));
        assert_eq!(seen, vec!["A=1", "A=2"]);
        assert!(map.get_str("A").is_some());
    }
}
