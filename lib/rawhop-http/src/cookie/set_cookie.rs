/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// One parsed `Set-Cookie` entry, before being matched against the request url
pub(super) struct SetCookie<'a> {
    pub(super) name: &'a str,
    pub(super) value: &'a str,
    pub(super) domain: Option<String>,
    pub(super) path: Option<&'a str>,
    pub(super) expires: Option<DateTime<Utc>>,
    pub(super) max_age: Option<i64>,
    pub(super) secure: bool,
    pub(super) http_only: bool,
}

impl<'a> SetCookie<'a> {
    pub(super) fn parse(s: &'a str) -> Option<Self> {
        let mut iter = s.split(';');
        let pair = iter.next()?;
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = SetCookie {
            name,
            value: value.trim(),
            domain: None,
            path: None,
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
        };

        for attr in iter {
            let (k, v) = match attr.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (attr.trim(), ""),
            };
            match k.to_ascii_lowercase().as_str() {
                "expires" => cookie.expires = parse_cookie_date(v),
                "max-age" => cookie.max_age = v.parse::<i64>().ok(),
                "domain" => {
                    let domain = v.trim_start_matches('.');
                    if !domain.is_empty() {
                        cookie.domain = Some(domain.to_ascii_lowercase());
                    }
                }
                "path" => {
                    if v.starts_with('/') {
                        cookie.path = Some(v);
                    }
                }
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                _ => {}
            }
        }
        Some(cookie)
    }

    /// Resolve the expiry time, `Max-Age` wins over `Expires`
    pub(super) fn expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.max_age {
            Some(secs) if secs <= 0 => Some(DateTime::<Utc>::MIN_UTC),
            Some(secs) => Some(
                TimeDelta::try_seconds(secs)
                    .and_then(|d| now.checked_add_signed(d))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
            None => self.expires,
        }
    }

    pub(super) fn is_deletion(&self, now: DateTime<Utc>) -> bool {
        if self.value.is_empty() || self.value == "deleted" {
            return true;
        }
        self.expiry(now).is_some_and(|t| t <= now)
    }
}

/// Split a folded `Set-Cookie` value.
///
/// A comma starts a new cookie only if the text after it looks like a
/// `name=value` pair, so the comma inside an `Expires` date is kept.
pub(super) fn split_set_cookie(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, _) in value.match_indices(',') {
        let next = &value[i + 1..];
        let token_end = next.find([';', ',']).unwrap_or(next.len());
        if next[..token_end].contains('=') {
            parts.push(value[start..i].trim());
            start = i + 1;
        }
    }
    parts.push(value[start..].trim());
    parts.retain(|s| !s.is_empty());
    parts
}

fn parse_cookie_date(s: &str) -> Option<DateTime<Utc>> {
    const FORMATS: &[&str] = &[
        "%a, %d %b %Y %H:%M:%S GMT",
        "%a, %d-%b-%Y %H:%M:%S GMT",
        "%A, %d-%b-%y %H:%M:%S GMT",
        "%a, %d-%b-%y %H:%M:%S GMT",
        "%a %b %e %H:%M:%S %Y",
    ];

    if let Ok(t) = DateTime::parse_from_rfc2822(s) {
        return Some(t.with_timezone(&Utc));
    }
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|t| t.and_utc())
}
