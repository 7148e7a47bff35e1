//! Host-name helpers shared by domain binding and cookie scoping.

use std::net::IpAddr;

/// Lowercase a host, drop any port, IPv6 brackets and trailing dot.
///
/// Accepts `example.com`, `Example.COM:8443`, `[::1]:3000`, `127.0.0.1:80`.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let bare = if let Some(rest) = host.strip_prefix('[') {
        // [v6]:port
        rest.split(']').next().unwrap_or(rest)
    } else if host.matches(':').count() == 1 {
        host.split(':').next().unwrap_or(host)
    } else {
        // unbracketed v6 literal or plain name
        host
    };
    bare.trim_end_matches('.').to_ascii_lowercase()
}

/// Whether the host is a literal IPv4/IPv6 address.
pub fn is_ip_literal(host: &str) -> bool {
    normalize_host(host).parse::<IpAddr>().is_ok()
}

/// Whether the host is a loopback or local-development host.
pub fn is_local_host(host: &str) -> bool {
    let host = normalize_host(host);
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(ip) => ip.is_loopback() || ip.is_unspecified(),
        Err(_) => false,
    }
}

/// The two-label parent domain of a host, e.g. `sub.example.com` → `example.com`.
///
/// Returns `None` for local hosts, IP literals and single-label hosts, which
/// must not be domain-scoped.
pub fn parent_domain(host: &str) -> Option<String> {
    let host = normalize_host(host);
    if host.is_empty() || is_local_host(&host) || host.parse::<IpAddr>().is_ok() {
        return None;
    }
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return None;
    }
    Some(labels[labels.len() - 2..].join("."))
}

/// Exact match or dot-subdomain, case-insensitive, ports ignored.
///
/// `domain` may carry a leading dot (`.example.com`).
pub fn is_same_or_subdomain(host: &str, domain: &str) -> bool {
    let host = normalize_host(host);
    let domain = normalize_host(domain.trim().trim_start_matches('.'));
    if host.is_empty() || domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_port_and_case() {
        assert_eq!(normalize_host("Shop.Example.COM:8443"), "shop.example.com");
        assert_eq!(normalize_host("[::1]:3000"), "::1");
        assert_eq!(normalize_host("::1"), "::1");
        assert_eq!(normalize_host("example.com."), "example.com");
    }

    #[test]
    fn local_hosts() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("localhost:5173"));
        assert!(is_local_host("app.localhost"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("[::1]:8080"));
        assert!(!is_local_host("example.com"));
        assert!(!is_local_host("10.0.0.5"));
    }

    #[test]
    fn parent_domain_scoping() {
        assert_eq!(parent_domain("sub.example.com").as_deref(), Some("example.com"));
        assert_eq!(parent_domain("a.b.example.com").as_deref(), Some("example.com"));
        assert_eq!(parent_domain("example.com").as_deref(), Some("example.com"));
        assert_eq!(parent_domain("localhost"), None);
        assert_eq!(parent_domain("192.168.1.10"), None);
        assert_eq!(parent_domain("intranet"), None);
    }

    #[test]
    fn subdomain_matching() {
        assert!(is_same_or_subdomain("example.com", "example.com"));
        assert!(is_same_or_subdomain("shop.example.com:443", ".Example.com"));
        assert!(!is_same_or_subdomain("badexample.com", "example.com"));
        assert!(!is_same_or_subdomain("example.com", "shop.example.com"));
        assert!(!is_same_or_subdomain("example.org", "example.com"));
    }
}
