//! Domain binding: a token is only trusted on the site it was minted for.

use agegate_types::host::{is_local_host, is_same_or_subdomain};

/// Whether a token claiming `claimed` may be used on `current_host`.
///
/// Without a claimed domain only local development hosts are accepted.
/// Otherwise the host must equal the claim or be a dot-subdomain of it,
/// case-insensitively and ignoring ports.
pub fn domain_matches(claimed: Option<&str>, current_host: &str) -> bool {
    match claimed.map(str::trim).filter(|d| !d.is_empty()) {
        None => is_local_host(current_host),
        Some(domain) => is_same_or_subdomain(current_host, domain),
    }
}
