//! Pluggable primitive detectors.

use crate::environment::headless_signal;
use crate::signatures::matching_signature;
use crate::ClientSignals;

/// One primitive automation signal.
pub trait Detector: Send + Sync {
    fn name(&self) -> &str;

    fn detect(&self, signals: &dyn ClientSignals) -> bool;
}

/// Matches the user agent against the built-in signature table.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureDetector;

impl Detector for SignatureDetector {
    fn name(&self) -> &str {
        "signature"
    }

    fn detect(&self, signals: &dyn ClientSignals) -> bool {
        match matching_signature(&signals.user_agent()) {
            Some(sig) => {
                tracing::debug!(signature = sig, "user agent matches crawler signature");
                true
            }
            None => false,
        }
    }
}

/// Headless-environment heuristics.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvironmentDetector;

impl Detector for EnvironmentDetector {
    fn name(&self) -> &str {
        "environment"
    }

    fn detect(&self, signals: &dyn ClientSignals) -> bool {
        match headless_signal(signals) {
            Some(signal) => {
                tracing::debug!(?signal, "headless environment signal");
                true
            }
            None => false,
        }
    }
}

/// Fires when the client cannot persist the session cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct StorageDetector;

impl Detector for StorageDetector {
    fn name(&self) -> &str {
        "no-storage"
    }

    fn detect(&self, signals: &dyn ClientSignals) -> bool {
        !signals.can_persist()
    }
}
