use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cookie storage unavailable: {0}")]
    Unavailable(String),

    #[error("cookie rejected: {0}")]
    Rejected(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
