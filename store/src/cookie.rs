//! Cookie model and the jar seam.

use crate::StoreError;
use agegate_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A cookie as written by the session cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// `None` is a host-only cookie; `Some(".example.com")` shares across subdomains.
    pub domain: Option<String>,
    pub path: String,
    /// `None` is a session cookie, dropped when the browser session ends.
    pub expires: Option<Timestamp>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: "/".to_string(),
            expires: None,
            secure: false,
            same_site: SameSite::Lax,
        }
    }

    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_expires(mut self, expires: Option<Timestamp>) -> Self {
        self.expires = expires;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn is_session(&self) -> bool {
        self.expires.is_none()
    }
}

/// Renders the `document.cookie` assignment form. `Expires` is written as
/// epoch seconds; hosts translate it to an HTTP date.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}", self.name, self.value, self.path)?;
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(expires) = self.expires {
            write!(f, "; Expires={}", expires.as_secs())?;
        }
        write!(f, "; SameSite={}", self.same_site.as_str())?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

/// The host's cookie store, as seen from the current top-level page.
pub trait CookieJar: Send + Sync {
    /// Write (or overwrite) a cookie.
    fn set(&self, cookie: &Cookie) -> Result<(), StoreError>;

    /// Read the value visible to the current page under `name`.
    fn get(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Expire the cookie `name` written with the given domain scope.
    fn remove(&self, name: &str, domain: Option<&str>) -> Result<(), StoreError>;
}
