//! Protocol version management.

use crate::ProtocolError;

/// Current protocol version, sent in the launch URL and configuration.
pub const PROTOCOL_VERSION: u16 = 1;

/// Minimum supported protocol version.
pub const MIN_PROTOCOL_VERSION: u16 = 1;

/// Check if a surface's protocol version is compatible.
pub fn is_compatible(version: u16) -> bool {
    (MIN_PROTOCOL_VERSION..=PROTOCOL_VERSION).contains(&version)
}

/// Like [`is_compatible`], as a `Result`.
pub fn ensure_compatible(version: u16) -> Result<(), ProtocolError> {
    if is_compatible(version) {
        Ok(())
    } else {
        Err(ProtocolError::UnsupportedVersion(version))
    }
}
