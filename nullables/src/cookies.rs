//! Nullable cookie jar: in-memory, with browser-like scoping.

use agegate_store::{Cookie, CookieJar, StoreError};
use agegate_types::host::{is_same_or_subdomain, normalize_host};
use agegate_types::{Clock, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Key = (String, Option<String>);

/// A cookie jar for a single page host.
///
/// Domain cookies are visible when the host matches the domain or is a
/// subdomain of it; expired cookies are invisible. Writes against a domain
/// the host does not belong to are rejected, as browsers do.
pub struct NullCookieJar {
    host: String,
    clock: Arc<dyn Clock>,
    cookies: Mutex<HashMap<Key, Cookie>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    discard_writes: AtomicBool,
    writes: AtomicUsize,
}

impl NullCookieJar {
    pub fn new(host: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            host: normalize_host(host),
            clock,
            cookies: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            discard_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set` and `remove` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Accept writes but store nothing (cookies disabled).
    pub fn discard_writes(&self, discard: bool) {
        self.discard_writes.store(discard, Ordering::SeqCst);
    }

    /// Every stored cookie, including expired ones.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookies
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect()
    }

    /// The stored cookie with exactly this name and domain scope.
    pub fn cookie(&self, name: &str, domain: Option<&str>) -> Option<Cookie> {
        self.cookies
            .lock()
            .unwrap()
            .get(&key(name, domain))
            .cloned()
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Place a cookie directly, bypassing scope checks.
    pub fn seed(&self, cookie: Cookie) {
        let k = key(&cookie.name, cookie.domain.as_deref());
        self.cookies.lock().unwrap().insert(k, cookie);
    }

    fn visible(&self, cookie: &Cookie, now: Timestamp) -> bool {
        let in_scope = match &cookie.domain {
            None => true,
            Some(d) => is_same_or_subdomain(&self.host, d),
        };
        let live = cookie.expires.map_or(true, |exp| exp > now);
        in_scope && live
    }
}

fn key(name: &str, domain: Option<&str>) -> Key {
    (
        name.to_string(),
        domain.map(|d| normalize_host(d.trim_start_matches('.'))),
    )
}

impl CookieJar for NullCookieJar {
    fn set(&self, cookie: &Cookie) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write failure injected".into()));
        }
        if let Some(domain) = &cookie.domain {
            if !is_same_or_subdomain(&self.host, domain) {
                return Err(StoreError::Rejected(format!(
                    "{} cannot set cookies for {domain}",
                    self.host
                )));
            }
        }
        if self.discard_writes.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let k = key(&cookie.name, cookie.domain.as_deref());
        self.cookies.lock().unwrap().insert(k, cookie.clone());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read failure injected".into()));
        }
        let now = self.clock.now();
        let cookies = self.cookies.lock().unwrap();
        Ok(cookies
            .iter()
            .filter(|((n, _), c)| n == name && self.visible(c, now))
            .map(|(_, c)| c.value.clone())
            .next())
    }

    fn remove(&self, name: &str, domain: Option<&str>) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write failure injected".into()));
        }
        self.cookies.lock().unwrap().remove(&key(name, domain));
        Ok(())
    }
}
