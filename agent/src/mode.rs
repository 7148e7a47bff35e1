//! Detection modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive detection signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Declared crawler/bot user agent.
    Signature,
    /// Headless execution environment.
    Environment,
    /// Client cannot persist the session cache.
    NoStorage,
}

/// How signals combine into a verdict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMode {
    #[default]
    Signature,
    Environment,
    NoStorage,
    /// Any signal.
    Combined,
    /// A declared bot string corroborated by environment or storage.
    Strict,
}

impl DetectionMode {
    /// Parse a mode name; unknown names fall back to [`DetectionMode::Signature`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "signature" => DetectionMode::Signature,
            "environment" => DetectionMode::Environment,
            "no-storage" | "nostorage" | "no_storage" => DetectionMode::NoStorage,
            "combined" => DetectionMode::Combined,
            "strict" => DetectionMode::Strict,
            other => {
                tracing::debug!(mode = other, "unknown detection mode, using signature");
                DetectionMode::Signature
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::Signature => "signature",
            DetectionMode::Environment => "environment",
            DetectionMode::NoStorage => "no-storage",
            DetectionMode::Combined => "combined",
            DetectionMode::Strict => "strict",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
