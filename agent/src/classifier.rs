//! Mode composition and short-lived memoisation.

use crate::detector::{Detector, EnvironmentDetector, SignatureDetector, StorageDetector};
use crate::{ClientSignals, DetectionMode, Signal};
use agegate_types::{Clock, Timestamp};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// How long a verdict is reused before the signals are re-read.
pub const DEFAULT_MEMO_WINDOW_SECS: u64 = 60;

/// Classifies the client as an automated agent, memoised per mode.
pub struct AgentClassifier {
    signature: Box<dyn Detector>,
    environment: Box<dyn Detector>,
    storage: Box<dyn Detector>,
    clock: Arc<dyn Clock>,
    memo_window_secs: u64,
    memo: Mutex<HashMap<DetectionMode, (Timestamp, bool)>>,
}

impl AgentClassifier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            signature: Box::new(SignatureDetector),
            environment: Box::new(EnvironmentDetector),
            storage: Box::new(StorageDetector),
            clock,
            memo_window_secs: DEFAULT_MEMO_WINDOW_SECS,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_memo_window(mut self, secs: u64) -> Self {
        self.memo_window_secs = secs;
        self
    }

    /// Replace the detector behind one primitive signal.
    pub fn with_detector(mut self, signal: Signal, detector: Box<dyn Detector>) -> Self {
        match signal {
            Signal::Signature => self.signature = detector,
            Signal::Environment => self.environment = detector,
            Signal::NoStorage => self.storage = detector,
        }
        self
    }

    /// Whether the client is an automated agent under `mode`.
    pub fn is_automated_agent(&self, mode: DetectionMode, signals: &dyn ClientSignals) -> bool {
        let now = self.clock.now();
        if let Some(&(at, verdict)) = self.memo.lock().get(&mode) {
            if !at.has_expired(self.memo_window_secs, now) {
                return verdict;
            }
        }

        let verdict = self.evaluate(mode, signals);
        tracing::debug!(%mode, verdict, "agent classification");
        self.memo.lock().insert(mode, (now, verdict));
        verdict
    }

    /// Drop all memoised verdicts.
    pub fn clear_cache(&self) {
        self.memo.lock().clear();
    }

    fn evaluate(&self, mode: DetectionMode, signals: &dyn ClientSignals) -> bool {
        let signature = || self.signature.detect(signals);
        let environment = || self.environment.detect(signals);
        let storage = || self.storage.detect(signals);
        match mode {
            DetectionMode::Signature => signature(),
            DetectionMode::Environment => environment(),
            DetectionMode::NoStorage => storage(),
            DetectionMode::Combined => signature() || environment() || storage(),
            DetectionMode::Strict => signature() && (environment() || storage()),
        }
    }
}
