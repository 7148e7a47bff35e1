//! Full token validation: signature, issuer, expiry, domain binding.

use crate::compact::{parse_claims, split};
use crate::domain::domain_matches;
use crate::{Claims, TokenError, EXPECTED_ALG};
use agegate_crypto::{signature_from_slice, verify_signature};
use agegate_types::{PublicKey, Timestamp};

/// Issuer expected when none is configured.
pub const DEFAULT_ISSUER: &str = "https://verify.agegate.example";

/// Trust anchors for token validation. Supplied by deployment configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub public_key: PublicKey,
    pub issuer: String,
}

/// Result of [`TokenValidator::validate`].
#[derive(Clone, Debug, PartialEq)]
pub struct TokenValidation {
    pub valid: bool,
    /// `true` only when the token is valid and asserts the user is of age.
    pub is_of_age: bool,
    /// Present whenever the claims could be parsed, even if invalid.
    pub claims: Option<Claims>,
    pub error: Option<TokenError>,
}

impl TokenValidation {
    fn accepted(claims: Claims) -> Self {
        Self {
            valid: true,
            is_of_age: claims.age_assertion.is_of_age,
            claims: Some(claims),
            error: None,
        }
    }

    fn rejected(claims: Option<Claims>, error: TokenError) -> Self {
        Self {
            valid: false,
            is_of_age: false,
            claims,
            error: Some(error),
        }
    }
}

/// Verifies tokens against a fixed key and issuer.
#[derive(Clone, Debug)]
pub struct TokenValidator {
    config: ValidatorConfig,
}

impl TokenValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a token for use on `current_host` at time `now`.
    pub fn validate(&self, token: &str, current_host: &str, now: Timestamp) -> TokenValidation {
        match self.verify(token, current_host, now) {
            Ok(claims) => TokenValidation::accepted(claims),
            Err((claims, error)) => {
                tracing::debug!(kind = %error.kind(), error = %error, "token rejected");
                TokenValidation::rejected(claims, error)
            }
        }
    }

    /// Checks in order: structure, algorithm, signature, claims, issuer,
    /// expiry, domain. Claims are returned alongside late failures.
    fn verify(
        &self,
        token: &str,
        current_host: &str,
        now: Timestamp,
    ) -> Result<Claims, (Option<Claims>, TokenError)> {
        let segments = split(token).map_err(|e| (None, e))?;

        if segments.header.alg != EXPECTED_ALG {
            return Err((
                None,
                TokenError::Unknown(format!("unsupported algorithm {}", segments.header.alg)),
            ));
        }

        let signature = signature_from_slice(&segments.signature)
            .ok_or((None, TokenError::BadSignature))?;
        if !verify_signature(
            segments.signing_input.as_bytes(),
            &signature,
            &self.config.public_key,
        ) {
            return Err((None, TokenError::BadSignature));
        }

        let claims = parse_claims(&segments.claims_json).map_err(|e| (None, e))?;

        if claims.iss != self.config.issuer {
            let err = TokenError::Unknown(format!("unexpected issuer {}", claims.iss));
            return Err((Some(claims), err));
        }

        if claims.is_expired(now) {
            let err = TokenError::Expired { exp: claims.exp };
            return Err((Some(claims), err));
        }

        if !domain_matches(claims.age_assertion.domain.as_deref(), current_host) {
            let err = TokenError::DomainMismatch {
                claimed: claims.age_assertion.domain.clone(),
                host: current_host.to_string(),
            };
            return Err((Some(claims), err));
        }

        Ok(claims)
    }
}
