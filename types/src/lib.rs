//! Fundamental types for AgeGate.
//!
//! Defines what every other crate in the workspace shares: the caller-supplied
//! verification identity, timestamps and the clock seam, host-name helpers,
//! and key material.

pub mod error;
pub mod host;
pub mod identity;
pub mod keys;
pub mod time;

pub use error::IdentityError;
pub use identity::{
    AssetId, Metadata, ReferenceId, Theme, VerificationIdentity, MAX_METADATA_BYTES,
    MAX_REFERENCE_ID_BYTES,
};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use time::{Clock, SystemClock, Timestamp};
