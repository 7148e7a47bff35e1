use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid base64url: {0}")]
    Encoding(String),

    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    KeyLength { expected: usize, actual: usize },

    #[error("not a valid Ed25519 public key")]
    InvalidPublicKey,
}
