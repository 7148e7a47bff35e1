//! Verification token handling.
//!
//! Tokens are compact EdDSA JWS values minted by the remote verification
//! service. This crate never issues tokens; it only:
//! 1. **decodes** claims without trusting them ([`decode`]), and
//! 2. **validates** signature, issuer, expiry and domain binding
//!    ([`TokenValidator::validate`]).

pub mod claims;
pub mod compact;
pub mod domain;
pub mod error;
pub mod validator;

pub use claims::{AgeAssertion, Claims, TokenHeader, EXPECTED_ALG};
pub use compact::decode;
pub use domain::domain_matches;
pub use error::{TokenError, TokenErrorKind};
pub use validator::{TokenValidation, TokenValidator, ValidatorConfig, DEFAULT_ISSUER};
