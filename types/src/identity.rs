//! Caller-supplied identity of a verification attempt.
//!
//! All size limits are measured in UTF-8 bytes of the encoded value and are
//! enforced at construction. Nothing is ever truncated.

use crate::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum encoded length of a reference id.
pub const MAX_REFERENCE_ID_BYTES: usize = 50;

/// Maximum length of the compact JSON serialisation of metadata.
pub const MAX_METADATA_BYTES: usize = 256;

/// Identifies the protected surface (site) being gated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityError> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(IdentityError::Missing("asset_id"));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one verification attempt; correlates it with server records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityError> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(IdentityError::Missing("reference_id"));
        }
        if s.len() > MAX_REFERENCE_ID_BYTES {
            return Err(IdentityError::TooLong {
                field: "reference_id",
                max: MAX_REFERENCE_ID_BYTES,
                actual: s.len(),
            });
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form caller metadata forwarded to the verification service.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(serde_json::Value);

impl Metadata {
    pub fn new(value: serde_json::Value) -> Result<Self, IdentityError> {
        let encoded = serde_json::to_string(&value)
            .map_err(|e| IdentityError::Unserializable(e.to_string()))?;
        if encoded.len() > MAX_METADATA_BYTES {
            return Err(IdentityError::TooLong {
                field: "metadata",
                max: MAX_METADATA_BYTES,
                actual: encoded.len(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Compact JSON, as placed in the launch URL.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

/// Who is being verified, for which asset, in which attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationIdentity {
    pub asset_id: AssetId,
    pub reference_id: ReferenceId,
    pub metadata: Option<Metadata>,
}

impl VerificationIdentity {
    /// Validate raw caller input into an identity.
    pub fn new(
        asset_id: impl Into<String>,
        reference_id: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, IdentityError> {
        Ok(Self {
            asset_id: AssetId::new(asset_id)?,
            reference_id: ReferenceId::new(reference_id)?,
            metadata: metadata.map(Metadata::new).transpose()?,
        })
    }
}

/// Colour scheme requested from the verification surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(IdentityError::UnknownTheme(other.to_string())),
        }
    }
}
