//! The cached verification token.
//!
//! Scoping policy: the record is written against the two-label parent domain
//! (`sub.example.com` → `.example.com`) so it is shared across subdomains,
//! except on local hosts and IP literals where it is host-only.
//!
//! Storage failures never propagate: reads degrade to "no cached session" and
//! writes/clears are logged and dropped.

use crate::{Cookie, CookieJar, StoreError};
use agegate_types::host::{normalize_host, parent_domain};
use agegate_types::{Clock, Timestamp};
use std::sync::Arc;

/// Name of the cookie holding the token.
pub const DEFAULT_COOKIE_NAME: &str = "agegate_session";

const PROBE_VALUE: &str = "1";

/// The top-level page the cache is scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteContext {
    pub host: String,
    /// Page served over https; the cookie is marked `Secure`.
    pub secure: bool,
}

impl SiteContext {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
        }
    }

    /// Domain attribute for writes, `None` for host-only.
    pub fn cookie_domain(&self) -> Option<String> {
        parent_domain(&self.host).map(|d| format!(".{d}"))
    }
}

/// A token plus the absolute expiry it was written with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    /// `None` means the record lives until the browser session ends.
    pub expires_at: Option<Timestamp>,
}

impl SessionRecord {
    /// Build a record from a TTL.
    ///
    /// `None`, zero or negative TTLs all produce a session-scoped record
    /// rather than one that is already expired.
    pub fn with_ttl(token: impl Into<String>, ttl_secs: Option<i64>, now: Timestamp) -> Self {
        let expires_at = match ttl_secs {
            Some(ttl) if ttl > 0 => Some(now.plus_secs(ttl as u64)),
            _ => None,
        };
        Self {
            token: token.into(),
            expires_at,
        }
    }
}

/// Persists the verification token in the site's cookie jar.
pub struct SessionCache {
    jar: Arc<dyn CookieJar>,
    site: SiteContext,
    clock: Arc<dyn Clock>,
    name: String,
}

impl SessionCache {
    pub fn new(jar: Arc<dyn CookieJar>, site: SiteContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            jar,
            site,
            clock,
            name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.name
    }

    pub fn site(&self) -> &SiteContext {
        &self.site
    }

    /// Write the token, overwriting any previous record.
    pub fn store(&self, token: &str, ttl_secs: Option<i64>) {
        let record = SessionRecord::with_ttl(token, ttl_secs, self.clock.now());
        let cookie = Cookie::new(&self.name, &record.token)
            .with_domain(self.site.cookie_domain())
            .with_expires(record.expires_at)
            .with_secure(self.site.secure);

        match self.jar.set(&cookie) {
            Ok(()) => tracing::debug!(
                domain = ?cookie.domain,
                expires_at = ?record.expires_at,
                "session token stored"
            ),
            Err(e) => tracing::warn!(error = %e, "failed to store session token"),
        }
    }

    /// The cached token, or `None` when absent or storage is unreadable.
    pub fn read(&self) -> Option<String> {
        match self.jar.get(&self.name) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "session cache unreadable, treating as empty");
                None
            }
        }
    }

    /// Remove the record under every scope it may have been written with.
    pub fn clear(&self) {
        let host = normalize_host(&self.site.host);
        let mut scopes: Vec<Option<String>> = vec![None, Some(host)];
        if let Some(parent) = self.site.cookie_domain() {
            scopes.push(Some(parent));
        }
        for scope in scopes {
            if let Err(e) = self.jar.remove(&self.name, scope.as_deref()) {
                tracing::warn!(error = %e, domain = ?scope, "failed to clear session token");
            }
        }
    }

    /// Strict write/read/delete round trip.
    pub fn probe(&self) -> Result<(), StoreError> {
        let probe_name = format!("{}_probe", self.name);
        let cookie = Cookie::new(&probe_name, PROBE_VALUE).with_secure(self.site.secure);
        self.jar.set(&cookie)?;
        let read_back = self.jar.get(&probe_name)?;
        self.jar.remove(&probe_name, None)?;
        match read_back.as_deref() {
            Some(PROBE_VALUE) => Ok(()),
            _ => Err(StoreError::Unavailable("probe value did not read back".into())),
        }
    }

    /// Whether storage appears usable. Failures are assumed transient and
    /// report `true`, so callers never block on a storage outage.
    pub fn is_available(&self) -> bool {
        if let Err(e) = self.probe() {
            tracing::debug!(error = %e, "storage probe failed, assuming available");
        }
        true
    }
}
