use proptest::prelude::*;

use agegate_nullables::TokenMinter;
use agegate_token::{decode, TokenValidator};
use agegate_types::Timestamp;

const NOW: u64 = 1_700_000_000;

proptest! {
    /// validate succeeds iff signature valid AND not expired AND domain bound;
    /// flipping any single condition flips the verdict.
    #[test]
    fn validity_is_conjunction_of_conditions(
        signed_by_trusted in any::<bool>(),
        expired in any::<bool>(),
        same_site in any::<bool>(),
        ttl in 1u64..86_400,
        label in "[a-z]{1,8}",
    ) {
        let trusted = TokenMinter::new([1u8; 32]);
        let untrusted = TokenMinter::new([2u8; 32]);
        let validator = TokenValidator::new(trusted.validator_config());

        let issued = if expired { NOW - ttl - 1 } else { NOW };
        let minter = if signed_by_trusted { &trusted } else { &untrusted };
        let claims = minter.claims(Some("example.com"), true, Timestamp::new(issued), ttl);
        let token = minter.mint(&claims);

        let host = if same_site {
            format!("{label}.example.com")
        } else {
            format!("{label}.example.net")
        };

        let result = validator.validate(&token, &host, Timestamp::new(NOW));
        prop_assert_eq!(result.valid, signed_by_trusted && !expired && same_site);
        prop_assert_eq!(result.is_of_age, result.valid);
    }

    /// decode never panics on arbitrary input.
    #[test]
    fn decode_never_panics(input in ".{0,200}") {
        let _ = decode(&input);
    }

    /// validate never panics and never accepts arbitrary three-part strings.
    #[test]
    fn arbitrary_segments_never_validate(
        a in "[A-Za-z0-9_-]{0,40}",
        b in "[A-Za-z0-9_-]{0,40}",
        c in "[A-Za-z0-9_-]{0,90}",
    ) {
        let validator = TokenValidator::new(TokenMinter::new([1u8; 32]).validator_config());
        let token = format!("{a}.{b}.{c}");
        prop_assert!(!validator.validate(&token, "example.com", Timestamp::new(NOW)).valid);
    }
}
