/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use url::Url;

use super::set_cookie::{SetCookie, split_set_cookie};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    /// only sent to exactly `domain`, not to its sub domains
    pub host_only: bool,
    pub path: String,
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    fn same_key(&self, other: &Cookie) -> bool {
        self.name == other.name
            && self.path == other.path
            && self.domain.eq_ignore_ascii_case(&other.domain)
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|t| t <= now)
    }

    fn domain_match(&self, host: &str) -> bool {
        if host.eq_ignore_ascii_case(&self.domain) {
            return true;
        }
        !self.host_only && domain_match(host, &self.domain)
    }

    fn path_match(&self, path: &str) -> bool {
        match path.strip_prefix(self.path.as_str()) {
            Some("") => true,
            Some(left) => self.path.ends_with('/') || left.starts_with('/'),
            None => false,
        }
    }

    fn applies_to(&self, host: &str, path: &str, secure: bool) -> bool {
        self.domain_match(host) && self.path_match(path) && (secure || !self.secure)
    }
}

fn domain_match(host: &str, domain: &str) -> bool {
    host.len() > domain.len()
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
        && host[host.len() - domain.len()..].eq_ignore_ascii_case(domain)
}

fn default_path(path: &str) -> &str {
    if !path.starts_with('/') {
        return "/";
    }
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(p) => &path[..p],
    }
}

/// Cookie jar shared by all requests of one session.
///
/// Cloning gives another handle to the same jar.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    inner: Arc<Mutex<Vec<Cookie>>>,
}

impl CookieStore {
    pub fn new() -> Self {
        CookieStore::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Cookie>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Snapshot of all stored cookies
    pub fn cookies(&self) -> Vec<Cookie> {
        self.lock().clone()
    }

    /// Value of the cookie `name` stored for exactly `domain`
    pub fn get(&self, domain: &str, name: &str) -> Option<String> {
        let now = Utc::now();
        self.lock()
            .iter()
            .find(|c| c.name == name && c.domain.eq_ignore_ascii_case(domain) && !c.is_expired(now))
            .map(|c| c.value.clone())
    }

    /// Add or replace a cookie with the same name, domain and path
    pub fn insert(&self, cookie: Cookie) {
        let mut jar = self.lock();
        match jar.iter_mut().find(|c| c.same_key(&cookie)) {
            Some(c) => *c = cookie,
            None => jar.push(cookie),
        }
    }

    /// Fold the value of a `Set-Cookie` or `Set-Cookie2` header received for `url`
    pub fn set_cookie(&self, url: &Url, header_value: &str) {
        let now = Utc::now();
        for s in split_set_cookie(header_value) {
            self.set_cookie_at(url, s, now);
        }
    }

    fn set_cookie_at(&self, url: &Url, s: &str, now: DateTime<Utc>) {
        let Some(host) = url.host_str() else {
            return;
        };
        let Some(set) = SetCookie::parse(s) else {
            log::trace!("ignore invalid set-cookie value {s}");
            return;
        };

        let (domain, host_only) = match &set.domain {
            Some(domain) => {
                if !host.eq_ignore_ascii_case(domain) && !domain_match(host, domain) {
                    log::trace!("ignore cookie {} for foreign domain {domain}", set.name);
                    return;
                }
                (domain.clone(), false)
            }
            None => (host.to_ascii_lowercase(), true),
        };
        let path = set.path.unwrap_or_else(|| default_path(url.path()));

        let cookie = Cookie {
            name: set.name.to_string(),
            value: set.value.to_string(),
            domain,
            host_only,
            path: path.to_string(),
            expires: set.expiry(now),
            secure: set.secure,
            http_only: set.http_only,
        };
        if set.is_deletion(now) {
            self.lock().retain(|c| !c.same_key(&cookie));
        } else {
            self.insert(cookie);
        }
    }

    /// Build the `Cookie` header value to send to `url`
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        let secure = url.scheme() == "https";
        let path = url.path();
        let now = Utc::now();

        let mut jar = self.lock();
        jar.retain(|c| !c.is_expired(now));
        let mut matched: Vec<&Cookie> = jar
            .iter()
            .filter(|c| c.applies_to(host, path, secure))
            .collect();
        if matched.is_empty() {
            return None;
        }
        // longer paths first
        matched.sort_by(|a, b| b.path.len().cmp(&a.path.len()));

        let mut value = String::with_capacity(matched.len() * 16);
        for (i, c) in matched.iter().enumerate() {
            if i > 0 {
                value.push_str("; ");
            }
            value.push_str(&c.name);
            value.push('=');
            value.push_str(&c.value);
        }
        Some(value)
    }

    /// Copy every cookie that would be sent to `from` into host-only cookies
    /// of host `to` with path `/`
    pub fn copy_to_host(&self, from: &Url, to: &str) {
        let Some(from_host) = from.host_str() else {
            return;
        };
        if from_host.eq_ignore_ascii_case(to) {
            return;
        }
        let secure = from.scheme() == "https";
        let now = Utc::now();

        let mut copied: Vec<Cookie> = self
            .lock()
            .iter()
            .filter(|c| !c.is_expired(now) && c.applies_to(from_host, from.path(), secure))
            .cloned()
            .collect();
        // the most specific path wins on name clashes
        copied.sort_by_key(|c| c.path.len());
        for c in copied {
            self.insert(Cookie {
                domain: to.to_ascii_lowercase(),
                host_only: true,
                path: "/".to_string(),
                ..c
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn set_and_send() {
        let store = CookieStore::new();
        let u = url("http://x.test/a/b");
        store.set_cookie(&u, "a=1");
        store.set_cookie(&u, "b=2; expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x.test", "a").as_deref(), Some("1"));
        assert!(store.get("x.test", "b").is_none());
        assert_eq!(store.cookie_header(&u).as_deref(), Some("a=1"));
    }

    #[test]
    fn header_join() {
        let store = CookieStore::new();
        let u = url("http://x.test/");
        store.set_cookie(&u, "a=1, b=2; Path=/");
        store.set_cookie(&u, "c=3; Path=/deep");
        assert_eq!(store.cookie_header(&u).as_deref(), Some("a=1; b=2"));
        assert_eq!(
            store.cookie_header(&url("http://x.test/deep/x")).as_deref(),
            Some("c=3; a=1; b=2")
        );
        assert!(store.cookie_header(&url("http://x.test/deeper")).unwrap() == "a=1; b=2");
    }

    #[test]
    fn default_paths() {
        assert_eq!(default_path(""), "/");
        assert_eq!(default_path("/"), "/");
        assert_eq!(default_path("/login"), "/");
        assert_eq!(default_path("/a/b/login"), "/a/b");
    }

    #[test]
    fn domain_rules() {
        let store = CookieStore::new();
        store.set_cookie(&url("http://www.x.test/"), "host=1");
        store.set_cookie(&url("http://www.x.test/"), "wide=1; Domain=.x.test");
        store.set_cookie(&url("http://www.x.test/"), "evil=1; Domain=y.test");
        assert_eq!(store.len(), 2);

        assert_eq!(
            store.cookie_header(&url("http://api.x.test/")).as_deref(),
            Some("wide=1")
        );
        assert_eq!(
            store.cookie_header(&url("http://WWW.x.test/")).as_deref(),
            Some("host=1; wide=1")
        );
        assert!(store.cookie_header(&url("http://notx.test/")).is_none());
    }

    #[test]
    fn secure_only_on_https() {
        let store = CookieStore::new();
        store.set_cookie(&url("https://x.test/"), "s=1; Secure");
        assert!(store.cookie_header(&url("http://x.test/")).is_none());
        assert_eq!(
            store.cookie_header(&url("https://x.test/")).as_deref(),
            Some("s=1")
        );
    }

    #[test]
    fn replace_and_delete() {
        let store = CookieStore::new();
        let u = url("http://x.test/");
        store.set_cookie(&u, "a=1");
        store.set_cookie(&u, "a=2");
        assert_eq!(store.get("x.test", "a").as_deref(), Some("2"));

        store.set_cookie(&u, "a=deleted");
        assert!(store.is_empty());

        store.set_cookie(&u, "a=1");
        store.set_cookie(&u, "a=1; Max-Age=0");
        assert!(store.is_empty());

        store.set_cookie(&u, "a=1");
        store.set_cookie(&u, "a=");
        assert!(store.is_empty());
    }

    #[test]
    fn expiry_at() {
        let store = CookieStore::new();
        let u = url("http://x.test/");
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        store.set_cookie_at(&u, "a=1; Max-Age=3600", now);
        let cookies = store.cookies();
        assert_eq!(
            cookies[0].expires,
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 1, 0, 0).unwrap())
        );
        // long expired by now
        assert!(store.cookie_header(&u).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn copy_to_new_host() {
        let store = CookieStore::new();
        store.set_cookie(&url("http://old.test/"), "a=1");
        store.set_cookie(&url("http://other.test/"), "b=2");
        store.copy_to_host(&url("http://old.test/login"), "new.test");
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.cookie_header(&url("http://new.test/")).as_deref(),
            Some("a=1")
        );
    }

    #[test]
    fn copy_parent_domain_and_deep_path() {
        let store = CookieStore::new();
        let login = url("http://www.x.test/account/login");
        store.set_cookie(&login, "sid=abc");
        store.set_cookie(&login, "wide=1; Domain=x.test");
        store.set_cookie(&login, "other=1; Path=/elsewhere");
        store.set_cookie(&url("https://www.x.test/"), "s=1; Secure");
        assert_eq!(store.cookies()[0].path, "/account");

        store.copy_to_host(&login, "Y.test");
        let copied: Vec<Cookie> = store
            .cookies()
            .into_iter()
            .filter(|c| c.domain == "y.test")
            .collect();
        assert_eq!(copied.len(), 2);
        assert!(copied.iter().all(|c| c.host_only && c.path == "/"));
        assert_eq!(
            store.cookie_header(&url("http://y.test/home")).as_deref(),
            Some("wide=1; sid=abc")
        );
        assert!(store.cookie_header(&url("http://sub.y.test/")).is_none());
    }

    #[test]
    fn copy_same_host_noop() {
        let store = CookieStore::new();
        let u = url("http://x.test/a/b");
        store.set_cookie(&u, "a=1");
        store.copy_to_host(&u, "X.TEST");
        assert_eq!(store.len(), 1);
    }
}
