use agegate_token::{TokenError, TokenErrorKind};
use agegate_types::IdentityError;
use thiserror::Error;

/// Everything an orchestration can fail with.
///
/// `Configuration` and `Environment` are construction-time and fatal; the
/// rest are delivered through `on_error`/`on_cancel` and the attempt handle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VerificationError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unsupported environment: {0}")]
    Environment(String),

    #[error("failed to launch verification: {0}")]
    Launch(String),

    #[error("token rejected: {0}")]
    Token(#[from] TokenError),

    #[error("verification service error {code}: {message}")]
    Remote { code: String, message: String },

    #[error("verification cancelled: {reason}")]
    Cancelled { reason: String },
}

impl VerificationError {
    /// User abandoned the flow; not a technical failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, VerificationError::Cancelled { .. })
    }

    /// Misconfiguration or an unusable host. Never retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VerificationError::Configuration(_) | VerificationError::Environment(_)
        )
    }

    pub fn token_kind(&self) -> Option<TokenErrorKind> {
        match self {
            VerificationError::Token(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<IdentityError> for VerificationError {
    fn from(e: IdentityError) -> Self {
        VerificationError::Configuration(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let cancelled = VerificationError::Cancelled {
            reason: "user".into(),
        };
        assert!(cancelled.is_cancellation());
        assert!(!cancelled.is_fatal());

        assert!(VerificationError::Configuration("x".into()).is_fatal());
        assert!(VerificationError::Environment("x".into()).is_fatal());
        assert!(!VerificationError::Launch("x".into()).is_fatal());
        assert!(!VerificationError::Remote {
            code: "E1".into(),
            message: "boom".into()
        }
        .is_cancellation());
    }

    #[test]
    fn identity_errors_are_configuration() {
        let err: VerificationError = IdentityError::Missing("asset_id").into();
        assert!(matches!(err, VerificationError::Configuration(_)));
    }

    #[test]
    fn token_errors_keep_their_kind() {
        let err: VerificationError = TokenError::BadSignature.into();
        assert_eq!(err.token_kind(), Some(TokenErrorKind::BadSignature));
    }
}
