//! Ed25519 key derivation and parsing.

use crate::CryptoError;
use agegate_types::{KeyPair, PrivateKey, PublicKey};
use ed25519_dalek::{SigningKey, VerifyingKey};

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Parse a hex-encoded Ed25519 public key, rejecting points off the curve.
pub fn public_key_from_hex(encoded: &str) -> Result<PublicKey, CryptoError> {
    let bytes = hex::decode(encoded.trim()).map_err(|e| CryptoError::Hex(e.to_string()))?;
    let arr: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::KeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
    VerifyingKey::from_bytes(&arr).map_err(|_| CryptoError::InvalidPublicKey)?;
    Ok(PublicKey(arr))
}

pub fn public_key_to_hex(key: &PublicKey) -> String {
    hex::encode(key.0)
}
