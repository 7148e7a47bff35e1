//! Attempt lifecycle.

use std::fmt;

/// Phase of an orchestrator's current verification attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttemptPhase {
    #[default]
    Idle,
    /// Building the launch URL and opening the surface.
    Launching,
    /// Surface open, waiting for a terminal message.
    AwaitingRemote,
    Resolved,
    Failed,
    Cancelled,
}

impl AttemptPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptPhase::Resolved | AttemptPhase::Failed | AttemptPhase::Cancelled
        )
    }

    /// Whether a live attempt exists in this phase.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, AttemptPhase::Launching | AttemptPhase::AwaitingRemote)
    }

    pub fn can_transition_to(&self, next: AttemptPhase) -> bool {
        use AttemptPhase::*;
        match (self, next) {
            (Idle, Launching) => true,
            (Launching, AwaitingRemote) => true,
            // failure to open, or close() before the open completed
            (Launching, Failed) | (Launching, Cancelled) => true,
            (AwaitingRemote, Resolved | Failed | Cancelled) => true,
            (Resolved | Failed | Cancelled, Idle) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptPhase::Idle => "idle",
            AttemptPhase::Launching => "launching",
            AttemptPhase::AwaitingRemote => "awaiting-remote",
            AttemptPhase::Resolved => "resolved",
            AttemptPhase::Failed => "failed",
            AttemptPhase::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AttemptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttemptPhase::*;

    #[test]
    fn happy_path_transitions() {
        assert!(Idle.can_transition_to(Launching));
        assert!(Launching.can_transition_to(AwaitingRemote));
        assert!(AwaitingRemote.can_transition_to(Resolved));
        assert!(Resolved.can_transition_to(Idle));
    }

    #[test]
    fn terminal_phases_only_return_to_idle() {
        for t in [Resolved, Failed, Cancelled] {
            assert!(t.is_terminal());
            assert!(!t.can_transition_to(Launching));
            assert!(!t.can_transition_to(Resolved));
        }
    }

    #[test]
    fn launch_failure_skips_awaiting() {
        assert!(Launching.can_transition_to(Failed));
        assert!(!Idle.can_transition_to(AwaitingRemote));
        assert!(!AwaitingRemote.can_transition_to(Launching));
    }
}
