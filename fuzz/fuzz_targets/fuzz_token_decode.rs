#![no_main]

use agegate_crypto::keypair_from_seed;
use agegate_token::{decode, TokenValidator, ValidatorConfig};
use agegate_types::Timestamp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let _ = decode(token);

    // Arbitrary input is never signed by this key, so it never validates.
    let validator = TokenValidator::new(ValidatorConfig {
        public_key: keypair_from_seed(&[42u8; 32]).public,
        issuer: "https://verify.agegate.example".into(),
    });
    let result = validator.validate(token, "example.com", Timestamp::new(1_700_000_000));
    assert!(!result.valid);
    assert!(!result.is_of_age);
});
