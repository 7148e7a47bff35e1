//! Token validation against minted tokens.

use agegate_crypto::b64url_encode;
use agegate_nullables::TokenMinter;
use agegate_token::{decode, TokenError, TokenErrorKind, TokenHeader, TokenValidator};
use agegate_types::Timestamp;

const NOW: u64 = 1_700_000_000;

fn setup() -> (TokenMinter, TokenValidator) {
    let minter = TokenMinter::new([7u8; 32]);
    let validator = TokenValidator::new(minter.validator_config());
    (minter, validator)
}

fn now() -> Timestamp {
    Timestamp::new(NOW)
}

#[test]
fn valid_of_age_token() {
    let (minter, validator) = setup();
    let token = minter.of_age_token("example.com", now());
    let result = validator.validate(&token, "shop.example.com", now());
    assert!(result.valid);
    assert!(result.is_of_age);
    assert!(result.error.is_none());
    assert_eq!(result.claims.unwrap().age_assertion.age_threshold, 18);
}

#[test]
fn valid_but_underage_token() {
    let (minter, validator) = setup();
    let token = minter.mint(&minter.claims(Some("example.com"), false, now(), 60));
    let result = validator.validate(&token, "example.com", now());
    assert!(result.valid);
    assert!(!result.is_of_age);
}

#[test]
fn expired_token() {
    let (minter, validator) = setup();
    let token = minter.mint(&minter.claims(Some("example.com"), true, Timestamp::new(NOW - 120), 60));
    let result = validator.validate(&token, "example.com", now());
    assert!(!result.valid);
    assert!(!result.is_of_age);
    assert_eq!(result.error.unwrap().kind(), TokenErrorKind::Expired);
    assert!(result.claims.is_some());
}

#[test]
fn expiry_boundary_is_exclusive() {
    let (minter, validator) = setup();
    let token = minter.mint(&minter.claims(Some("example.com"), true, now(), 10));
    assert!(validator.validate(&token, "example.com", Timestamp::new(NOW + 9)).valid);
    assert!(!validator.validate(&token, "example.com", Timestamp::new(NOW + 10)).valid);
}

#[test]
fn foreign_key_is_bad_signature() {
    let (_, validator) = setup();
    let other = TokenMinter::new([8u8; 32]);
    let token = other.of_age_token("example.com", now());
    let result = validator.validate(&token, "example.com", now());
    assert_eq!(result.error, Some(TokenError::BadSignature));
    assert!(result.claims.is_none());
}

#[test]
fn tampered_claims_is_bad_signature() {
    let (minter, validator) = setup();
    let token = minter.mint(&minter.claims(Some("example.com"), false, now(), 60));
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let forged = minter.claims(Some("example.com"), true, now(), 60);
    parts[1] = b64url_encode(&serde_json::to_vec(&forged).unwrap());
    let result = validator.validate(&parts.join("."), "example.com", now());
    assert_eq!(result.error, Some(TokenError::BadSignature));
}

#[test]
fn cross_site_token_is_domain_mismatch() {
    let (minter, validator) = setup();
    let token = minter.of_age_token("example.com", now());
    let result = validator.validate(&token, "example.org", now());
    assert!(!result.valid);
    assert_eq!(result.error.unwrap().kind(), TokenErrorKind::DomainMismatch);
}

#[test]
fn domainless_token_only_on_localhost() {
    let (minter, validator) = setup();
    let token = minter.mint(&minter.claims(None, true, now(), 60));
    assert!(validator.validate(&token, "localhost:5173", now()).valid);
    assert_eq!(
        validator.validate(&token, "example.com", now()).error.unwrap().kind(),
        TokenErrorKind::DomainMismatch
    );
}

#[test]
fn wrong_issuer_is_unknown() {
    let (_, validator) = setup();
    let minter = TokenMinter::new([7u8; 32]).with_issuer("https://impostor.example");
    let token = minter.of_age_token("example.com", now());
    assert_eq!(
        validator.validate(&token, "example.com", now()).error.unwrap().kind(),
        TokenErrorKind::Unknown
    );
}

#[test]
fn unsupported_algorithm_is_rejected() {
    let (minter, validator) = setup();
    let header = TokenHeader {
        alg: "none".into(),
        typ: None,
        kid: None,
    };
    let token = minter.mint_with_header(&header, &minter.claims(Some("example.com"), true, now(), 60));
    assert_eq!(
        validator.validate(&token, "example.com", now()).error.unwrap().kind(),
        TokenErrorKind::Unknown
    );
}

#[test]
fn malformed_structure() {
    let (_, validator) = setup();
    for garbage in ["", "abc", "a.b", "a.b.c", "####.####.####"] {
        let result = validator.validate(garbage, "example.com", now());
        assert!(!result.valid, "{garbage} should not validate");
        assert_eq!(result.error.unwrap().kind(), TokenErrorKind::Malformed, "{garbage}");
    }
}

#[test]
fn decode_trusts_nothing_but_reads_claims() {
    let other = TokenMinter::new([9u8; 32]);
    let token = other.of_age_token("elsewhere.net", now());
    let claims = decode(&token).expect("decodes regardless of signer");
    assert_eq!(claims.age_assertion.domain.as_deref(), Some("elsewhere.net"));
}
