use proptest::prelude::*;

use agegate_types::host::{is_same_or_subdomain, normalize_host, parent_domain};
use agegate_types::{Metadata, ReferenceId, Timestamp, MAX_METADATA_BYTES, MAX_REFERENCE_ID_BYTES};

proptest! {
    /// A reference id is accepted iff its UTF-8 encoding fits the limit.
    #[test]
    fn reference_id_limit_is_byte_based(s in "[a-zA-Z0-9éü-]{1,80}") {
        let accepted = ReferenceId::new(s.clone()).is_ok();
        prop_assert_eq!(accepted, s.len() <= MAX_REFERENCE_ID_BYTES);
    }

    /// Metadata is accepted iff its compact JSON fits the limit.
    #[test]
    fn metadata_limit_matches_serialized_length(payload in "[a-z ]{0,300}") {
        let value = serde_json::json!({ "note": payload });
        let len = value.to_string().len();
        prop_assert_eq!(Metadata::new(value).is_ok(), len <= MAX_METADATA_BYTES);
    }

    /// Any subdomain of a domain matches it, regardless of case and port.
    #[test]
    fn subdomain_always_matches(
        label in "[a-z][a-z0-9]{0,10}",
        domain in "[a-z]{2,10}\\.(com|org|net)",
        port in 1u16..65535,
    ) {
        let host = format!("{}.{}:{}", label.to_uppercase(), domain, port);
        prop_assert!(is_same_or_subdomain(&host, &domain));
    }

    /// A suffix without the dot boundary never matches.
    #[test]
    fn glued_prefix_never_matches(
        prefix in "[a-z]{1,8}",
        domain in "[a-z]{2,10}\\.(com|org|net)",
    ) {
        let host = format!("{prefix}{domain}");
        prop_assert!(!is_same_or_subdomain(&host, &domain));
    }

    /// The parent domain is always a suffix of the normalized host.
    #[test]
    fn parent_domain_is_suffix(host in "([a-z]{1,6}\\.){1,4}[a-z]{2,5}") {
        if let Some(parent) = parent_domain(&host) {
            prop_assert!(normalize_host(&host).ends_with(&parent));
            prop_assert_eq!(parent.split('.').count(), 2);
        }
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired_correct(
        start in 0u64..500_000,
        duration in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let t = Timestamp::new(start);
        let now = Timestamp::new(start.saturating_add(offset));
        prop_assert_eq!(t.has_expired(duration, now), offset >= duration);
    }

    /// secs_from is the signed difference.
    #[test]
    fn timestamp_secs_from(a in 0u64..1_000_000_000, b in 0u64..1_000_000_000) {
        prop_assert_eq!(Timestamp::new(a).secs_from(Timestamp::new(b)), a as i64 - b as i64);
    }
}
