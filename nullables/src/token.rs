//! Test token minter: stands in for the remote verification service.

use agegate_crypto::{b64url_encode, keypair_from_seed, sign_message};
use agegate_token::{AgeAssertion, Claims, TokenHeader, ValidatorConfig};
use agegate_types::{KeyPair, PublicKey, Timestamp};

/// Issuer used by minted tokens unless overridden.
pub const TEST_ISSUER: &str = "https://verify.test.agegate";

/// Signs verification tokens with a deterministic key.
pub struct TokenMinter {
    keypair: KeyPair,
    issuer: String,
}

impl TokenMinter {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            keypair: keypair_from_seed(&seed),
            issuer: TEST_ISSUER.to_string(),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public.clone()
    }

    /// Validator configuration trusting this minter.
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            public_key: self.public_key(),
            issuer: self.issuer.clone(),
        }
    }

    /// Claims for an of-age assertion bound to `domain`, valid for `ttl_secs`.
    pub fn claims(&self, domain: Option<&str>, is_of_age: bool, now: Timestamp, ttl_secs: u64) -> Claims {
        Claims {
            iss: self.issuer.clone(),
            sub: "subject-1".to_string(),
            iat: now.as_secs(),
            exp: now.as_secs() + ttl_secs,
            jti: format!("jti-{}", now.as_secs()),
            age_assertion: AgeAssertion {
                age_threshold: 18,
                confidence: 0.97,
                status: if is_of_age { "verified" } else { "underage" }.to_string(),
                is_of_age,
                domain: domain.map(str::to_string),
            },
        }
    }

    /// Sign claims with the default EdDSA header.
    pub fn mint(&self, claims: &Claims) -> String {
        self.mint_with_header(&TokenHeader::default(), claims)
    }

    pub fn mint_with_header(&self, header: &TokenHeader, claims: &Claims) -> String {
        let header_json = serde_json::to_vec(header).unwrap();
        let claims_json = serde_json::to_vec(claims).unwrap();
        let signing_input = format!("{}.{}", b64url_encode(&header_json), b64url_encode(&claims_json));
        let sig = sign_message(signing_input.as_bytes(), &self.keypair.private);
        format!("{signing_input}.{}", b64url_encode(&sig.0))
    }

    /// Shorthand: an of-age token for `domain` valid for an hour from `now`.
    pub fn of_age_token(&self, domain: &str, now: Timestamp) -> String {
        self.mint(&self.claims(Some(domain), true, now, 3600))
    }
}
