//! Identity validation errors.

use thiserror::Error;

/// Why a [`VerificationIdentity`](crate::VerificationIdentity) field was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} is {actual} bytes encoded, maximum is {max}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("metadata could not be serialized: {0}")]
    Unserializable(String),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),
}
