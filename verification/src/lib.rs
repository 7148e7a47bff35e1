//! Verification orchestration.
//!
//! An [`Orchestrator`] per asset reuses a cached session when one validates,
//! lets recognised automated agents through when configured to, and
//! otherwise opens the verification surface and drives the attempt from the
//! surface's messages to a single outcome.
//!
//! At most one attempt is in flight per [`OrchestrationContext`]; overlapping
//! callers join it and observe the same outcome.

pub mod attempt;
pub mod callbacks;
pub mod config;
pub mod context;
pub mod error;
pub mod options;
pub mod orchestrator;
pub mod state;

pub use attempt::{AttemptHandle, AttemptResult, PendingAttempt};
pub use callbacks::{Callbacks, InfoEvent, Observer, SuccessEvent};
pub use config::GateConfig;
pub use context::{OrchestrationContext, OrchestrationState};
pub use error::VerificationError;
pub use options::{LaunchMode, ValidateOptions};
pub use orchestrator::{Deps, HostCapabilities, Orchestrator};
pub use state::AttemptPhase;
