//! Nullable client signals: a controllable profile that counts reads.

use agegate_agent::{ClientProfile, ClientSignals, GraphicsInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Client signals backed by a mutable [`ClientProfile`].
pub struct NullSignals {
    profile: Mutex<ClientProfile>,
    user_agent_reads: AtomicUsize,
}

impl NullSignals {
    pub fn new(profile: ClientProfile) -> Self {
        Self {
            profile: Mutex::new(profile),
            user_agent_reads: AtomicUsize::new(0),
        }
    }

    /// An ordinary desktop browser.
    pub fn desktop() -> Self {
        Self::new(ClientProfile::browser(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ))
    }

    /// Change the profile in place.
    pub fn update(&self, f: impl FnOnce(&mut ClientProfile)) {
        f(&mut self.profile.lock().unwrap());
    }

    /// How many times the user agent was read (memoisation checks).
    pub fn user_agent_reads(&self) -> usize {
        self.user_agent_reads.load(Ordering::SeqCst)
    }
}

impl ClientSignals for NullSignals {
    fn user_agent(&self) -> String {
        self.user_agent_reads.fetch_add(1, Ordering::SeqCst);
        self.profile.lock().unwrap().user_agent.clone()
    }

    fn plugin_count(&self) -> Option<usize> {
        self.profile.lock().unwrap().plugin_count
    }

    fn languages(&self) -> Vec<String> {
        self.profile.lock().unwrap().languages.clone()
    }

    fn graphics(&self) -> Option<GraphicsInfo> {
        self.profile.lock().unwrap().graphics.clone()
    }

    fn can_persist(&self) -> bool {
        self.profile.lock().unwrap().can_persist
    }
}
