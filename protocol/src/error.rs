use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u16),

    #[error("message too large: {size} > {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("message type {0} is not accepted in this direction")]
    UnexpectedKind(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("frame target rejected message: {0}")]
    PostFailed(String),
}
