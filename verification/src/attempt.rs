//! Single-resolution result channel for one verification attempt.
//!
//! The pending attempt owns the sending half; every caller that launches or
//! joins the attempt holds an [`AttemptHandle`]. The result is written once
//! and every handle observes the same value.

use crate::orchestrator::Orchestrator;
use crate::VerificationError;
use agegate_types::{AssetId, ReferenceId};
use std::sync::Weak;
use tokio::sync::watch;

pub type AttemptResult = Result<bool, VerificationError>;

/// The in-flight attempt recorded in the orchestration state.
#[derive(Debug)]
pub struct PendingAttempt {
    id: u64,
    asset_id: AssetId,
    reference_id: ReferenceId,
    /// The orchestrator that opened the surface for this attempt.
    owner: Weak<Orchestrator>,
    sender: watch::Sender<Option<AttemptResult>>,
}

impl PendingAttempt {
    pub(crate) fn new(
        id: u64,
        asset_id: AssetId,
        reference_id: ReferenceId,
        owner: Weak<Orchestrator>,
    ) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            id,
            asset_id,
            reference_id,
            owner,
            sender,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    pub fn reference_id(&self) -> &ReferenceId {
        &self.reference_id
    }

    pub(crate) fn owner(&self) -> Weak<Orchestrator> {
        self.owner.clone()
    }

    pub fn subscribe(&self) -> AttemptHandle {
        AttemptHandle {
            reference_id: self.reference_id.clone(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish the outcome. Only the first settlement is kept.
    pub(crate) fn settle(&self, result: AttemptResult) -> bool {
        self.sender.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(result);
            true
        })
    }
}

/// A caller's view of an attempt's outcome.
#[derive(Clone, Debug)]
pub struct AttemptHandle {
    reference_id: ReferenceId,
    receiver: watch::Receiver<Option<AttemptResult>>,
}

impl AttemptHandle {
    /// A handle whose outcome is already known.
    pub(crate) fn settled(reference_id: ReferenceId, result: AttemptResult) -> Self {
        let (_, receiver) = watch::channel(Some(result));
        Self {
            reference_id,
            receiver,
        }
    }

    pub fn reference_id(&self) -> &ReferenceId {
        &self.reference_id
    }

    /// The outcome if it has been published.
    pub fn try_outcome(&self) -> Option<AttemptResult> {
        self.receiver.borrow().clone()
    }

    pub fn is_settled(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    /// Wait for the outcome. An attempt torn down without a result reports
    /// a cancellation.
    pub async fn outcome(mut self) -> AttemptResult {
        loop {
            if let Some(result) = self.receiver.borrow_and_update().clone() {
                return result;
            }
            if self.receiver.changed().await.is_err() {
                return Err(VerificationError::Cancelled {
                    reason: "attempt abandoned".into(),
                });
            }
        }
    }
}
