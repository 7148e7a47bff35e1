//! Cryptographic primitives for AgeGate.
//!
//! - **Ed25519** signature verification for verification tokens
//! - **base64url** (unpadded) encoding used by compact token segments
//! - Key parsing from the hex form used in configuration

pub mod encoding;
pub mod error;
pub mod keys;
pub mod sign;

pub use encoding::{b64url_decode, b64url_encode};
pub use error::CryptoError;
pub use keys::{keypair_from_seed, public_from_private, public_key_from_hex, public_key_to_hex};
pub use sign::{sign_message, signature_from_slice, verify_signature};
