use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a token was not trusted. Never fatal: callers treat the session as
/// unverified and launch a fresh attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired at {exp}")]
    Expired { exp: u64 },

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token bound to {claimed:?}, current host is {host}")]
    DomainMismatch { claimed: Option<String>, host: String },

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("{0}")]
    Unknown(String),
}

/// Classified tag for a [`TokenError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenErrorKind {
    Expired,
    BadSignature,
    DomainMismatch,
    Malformed,
    Unknown,
}

impl TokenError {
    pub fn kind(&self) -> TokenErrorKind {
        match self {
            TokenError::Expired { .. } => TokenErrorKind::Expired,
            TokenError::BadSignature => TokenErrorKind::BadSignature,
            TokenError::DomainMismatch { .. } => TokenErrorKind::DomainMismatch,
            TokenError::Malformed(_) => TokenErrorKind::Malformed,
            TokenError::Unknown(_) => TokenErrorKind::Unknown,
        }
    }
}

impl TokenErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenErrorKind::Expired => "expired",
            TokenErrorKind::BadSignature => "bad-signature",
            TokenErrorKind::DomainMismatch => "domain-mismatch",
            TokenErrorKind::Malformed => "malformed",
            TokenErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
