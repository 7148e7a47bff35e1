//! Token header and claim set.

use agegate_types::Timestamp;
use serde::{Deserialize, Serialize};

/// The only signing algorithm accepted.
pub const EXPECTED_ALG: &str = "EdDSA";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            alg: EXPECTED_ALG.to_string(),
            typ: Some("JWT".to_string()),
            kid: None,
        }
    }
}

/// Claims carried by a verification token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    /// Issued-at, Unix seconds.
    pub iat: u64,
    /// Expiry, Unix seconds.
    pub exp: u64,
    pub jti: String,
    pub age_assertion: AgeAssertion,
}

/// The age outcome asserted by the verification service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeAssertion {
    pub age_threshold: u32,
    pub confidence: f64,
    pub status: String,
    pub is_of_age: bool,
    /// Site the token was minted for. `None` only for local development.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Claims {
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::new(self.exp)
    }

    pub fn issued_at(&self) -> Timestamp {
        Timestamp::new(self.iat)
    }

    /// Expired when `exp` is at or before `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at() <= now
    }
}
