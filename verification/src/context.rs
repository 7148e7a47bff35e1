//! Process-wide orchestration state.
//!
//! One [`OrchestrationContext`] holds the instance registry and the single
//! in-flight attempt. [`OrchestrationContext::global`] is the process-wide
//! instance; tests build their own with [`OrchestrationContext::new`] or call
//! [`OrchestrationContext::reset`] between cases. Only orchestrators mutate
//! the state.

use crate::attempt::{AttemptResult, PendingAttempt};
use crate::config::GateConfig;
use crate::orchestrator::{Deps, Orchestrator};
use crate::VerificationError;
use agegate_types::{AssetId, ReferenceId, VerificationIdentity};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

/// First wait while another caller is constructing the same instance.
pub const CREATION_BACKOFF_START: Duration = Duration::from_millis(10);
/// Ceiling for the doubling wait.
pub const CREATION_BACKOFF_MAX: Duration = Duration::from_millis(80);
/// Polls before giving up on a stuck construction.
pub const CREATION_MAX_POLLS: u32 = 40;

#[derive(Debug, Default)]
pub struct OrchestrationState {
    /// An attempt is between launch and settlement.
    pub(crate) active_attempt: bool,
    pub(crate) pending_reference_id: Option<ReferenceId>,
    pub(crate) pending: Option<PendingAttempt>,
    pub(crate) instances: HashMap<AssetId, Arc<Orchestrator>>,
    pub(crate) creation_locks: HashSet<AssetId>,
    next_attempt_id: u64,
}

impl OrchestrationState {
    pub(crate) fn next_attempt_id(&mut self) -> u64 {
        self.next_attempt_id += 1;
        self.next_attempt_id
    }
}

enum Slot {
    Existing(Arc<Orchestrator>),
    Acquired,
    Busy,
}

#[derive(Debug, Default)]
pub struct OrchestrationContext {
    state: Mutex<OrchestrationState>,
}

static GLOBAL: OnceLock<Arc<OrchestrationContext>> = OnceLock::new();

impl OrchestrationContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The process-wide context.
    pub fn global() -> Arc<Self> {
        GLOBAL.get_or_init(OrchestrationContext::new).clone()
    }

    /// Drop every instance and cancel the pending attempt, if any.
    pub fn reset(&self) {
        let pending = {
            let mut state = self.state.lock();
            let next_attempt_id = state.next_attempt_id;
            let pending = state.pending.take();
            *state = OrchestrationState {
                next_attempt_id,
                ..OrchestrationState::default()
            };
            pending
        };
        if let Some(pending) = pending {
            pending.settle(Err(VerificationError::Cancelled {
                reason: "orchestration reset".into(),
            }));
        }
        tracing::debug!("orchestration context reset");
    }

    pub fn has_active_attempt(&self) -> bool {
        self.state.lock().active_attempt
    }

    pub fn pending_reference_id(&self) -> Option<ReferenceId> {
        self.state.lock().pending_reference_id.clone()
    }

    pub fn instance(&self, asset_id: &AssetId) -> Option<Arc<Orchestrator>> {
        self.state.lock().instances.get(asset_id).cloned()
    }

    pub fn instance_count(&self) -> usize {
        self.state.lock().instances.len()
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut OrchestrationState) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// The pending attempt's id and the orchestrator driving it.
    pub(crate) fn pending_owner(&self) -> Option<(u64, Weak<Orchestrator>)> {
        self.with_state(|state| state.pending.as_ref().map(|p| (p.id(), p.owner())))
    }

    /// Clear the attempt flags if `attempt_id` is still the pending attempt
    /// and publish `result` to its handles.
    pub(crate) fn settle(&self, attempt_id: u64, result: AttemptResult) {
        let pending = self.with_state(|state| {
            if state.pending.as_ref().map(PendingAttempt::id) != Some(attempt_id) {
                return None;
            }
            state.active_attempt = false;
            state.pending_reference_id = None;
            state.pending.take()
        });
        match pending {
            Some(pending) => {
                pending.settle(result);
            }
            None => tracing::debug!(attempt_id, "attempt no longer pending, result dropped"),
        }
    }

    /// Look up the orchestrator for `identity.asset_id`, constructing it if
    /// none exists.
    ///
    /// Concurrent callers for the same asset converge on one instance: while
    /// one caller holds the construction lock the others poll with a
    /// doubling backoff. The identity of the first caller wins.
    pub async fn get_or_create_instance(
        self: &Arc<Self>,
        identity: VerificationIdentity,
        deps: Deps,
        config: Arc<GateConfig>,
    ) -> Result<Arc<Orchestrator>, VerificationError> {
        let asset_id = identity.asset_id.clone();
        let mut delay = CREATION_BACKOFF_START;
        let mut polls = 0;

        loop {
            let slot = self.with_state(|state| {
                if let Some(existing) = state.instances.get(&asset_id) {
                    Slot::Existing(existing.clone())
                } else if state.creation_locks.insert(asset_id.clone()) {
                    Slot::Acquired
                } else {
                    Slot::Busy
                }
            });
            match slot {
                Slot::Existing(existing) => return Ok(existing),
                Slot::Acquired => break,
                Slot::Busy => {}
            }

            polls += 1;
            if polls >= CREATION_MAX_POLLS {
                return Err(VerificationError::Environment(format!(
                    "timed out waiting for orchestrator construction for {asset_id}"
                )));
            }
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(CREATION_BACKOFF_MAX);
        }

        let built = Orchestrator::new(identity, deps, config, self.clone());
        self.with_state(|state| {
            state.creation_locks.remove(&asset_id);
            if let Ok(instance) = &built {
                state.instances.insert(asset_id.clone(), instance.clone());
            }
        });
        if built.is_ok() {
            tracing::info!(%asset_id, "orchestrator created");
        }
        built
    }
}
