//! Origin allow-list for inbound messages.

use agegate_types::host::is_local_host;
use std::collections::BTreeSet;
use url::Url;

/// Canonical `scheme://host[:port]` form, default ports dropped.
pub fn normalize_origin(origin: &str) -> Option<String> {
    let url = Url::parse(origin.trim()).ok()?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Origins allowed to message the gate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustedOrigins {
    origins: BTreeSet<String>,
    allow_local: bool,
}

impl TrustedOrigins {
    /// Build from configured origins. Entries that do not parse are skipped
    /// with a warning.
    pub fn new<I, S>(origins: I, allow_local: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for origin in origins {
            match normalize_origin(origin.as_ref()) {
                Some(o) => {
                    set.insert(o);
                }
                None => tracing::warn!(origin = origin.as_ref(), "ignoring invalid trusted origin"),
            }
        }
        Self {
            origins: set,
            allow_local,
        }
    }

    /// Whether messages from `origin` may reach the state machine.
    pub fn is_trusted(&self, origin: &str) -> bool {
        let Some(normalized) = normalize_origin(origin) else {
            return false;
        };
        if self.origins.contains(&normalized) {
            return true;
        }
        self.allow_local
            && Url::parse(&normalized)
                .ok()
                .and_then(|u| u.host_str().map(is_local_host))
                .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_default_ports_and_case() {
        assert_eq!(
            normalize_origin("HTTPS://Verify.Example.com:443/path").as_deref(),
            Some("https://verify.example.com")
        );
        assert_eq!(
            normalize_origin("http://localhost:5173").as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(normalize_origin("null"), None);
        assert_eq!(normalize_origin("file:///etc/passwd"), None);
    }

    #[test]
    fn exact_origin_match_only() {
        let trusted = TrustedOrigins::new(["https://verify.example.com"], false);
        assert!(trusted.is_trusted("https://verify.example.com"));
        assert!(!trusted.is_trusted("http://verify.example.com"));
        assert!(!trusted.is_trusted("https://verify.example.com:8443"));
        assert!(!trusted.is_trusted("https://evil.verify.example.com"));
        assert!(!trusted.is_trusted("https://localhost:3000"));
    }

    #[test]
    fn local_development_origins() {
        let trusted = TrustedOrigins::new(["https://verify.example.com"], true);
        assert!(trusted.is_trusted("http://localhost:3000"));
        assert!(trusted.is_trusted("http://127.0.0.1:8080"));
        assert!(trusted.is_trusted("http://[::1]:8080"));
        assert!(!trusted.is_trusted("http://192.168.0.2"));
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let trusted = TrustedOrigins::new(["not an origin", "https://ok.example"], false);
        assert_eq!(trusted.iter().collect::<Vec<_>>(), vec!["https://ok.example"]);
    }
}
