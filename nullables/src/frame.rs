//! Nullable frame: record posted messages instead of delivering them.

use agegate_protocol::{FrameTarget, ProtocolError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A frame target that records every post.
#[derive(Default)]
pub struct NullFrame {
    posted: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl NullFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every post fail.
    pub fn fail_posts(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// `(payload, target_origin)` pairs in post order.
    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().unwrap().clone()
    }

    /// Posted payloads parsed as JSON.
    pub fn posted_json(&self) -> Vec<serde_json::Value> {
        self.posted()
            .iter()
            .filter_map(|(p, _)| serde_json::from_str(p).ok())
            .collect()
    }
}

impl FrameTarget for NullFrame {
    fn post(&self, payload: &str, target_origin: &str) -> Result<(), ProtocolError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProtocolError::PostFailed("post failure injected".into()));
        }
        self.posted
            .lock()
            .unwrap()
            .push((payload.to_string(), target_origin.to_string()));
        Ok(())
    }
}
