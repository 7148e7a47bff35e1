//! Caller-facing subscribers over attempt outcomes and informational events.

use crate::VerificationError;
use agegate_messages::{InfoPayload, ProgressPayload, StateChangePayload, UserActionPayload};
use std::fmt;
use std::sync::Arc;

/// What the surface reported on `success`.
#[derive(Clone, Debug, PartialEq)]
pub struct SuccessEvent {
    pub reference_id: String,
    pub token: Option<String>,
    /// Age claim read from the token before it was validated.
    pub is_of_age_hint: Option<bool>,
    /// Outcome after full validation.
    pub is_of_age: bool,
}

type SuccessFn = Arc<dyn Fn(&SuccessEvent) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&VerificationError) + Send + Sync>;
type NotifyFn = Arc<dyn Fn() + Send + Sync>;

/// Per-attempt callbacks. Registered by the caller that starts an attempt
/// and dropped when the attempt ends.
#[derive(Clone, Default)]
pub struct Callbacks {
    on_success: Option<SuccessFn>,
    on_age_pass: Option<NotifyFn>,
    on_age_fail: Option<NotifyFn>,
    on_error: Option<ErrorFn>,
    on_cancel: Option<NotifyFn>,
    on_close: Option<NotifyFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, f: impl Fn(&SuccessEvent) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_age_pass(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_age_pass = Some(Arc::new(f));
        self
    }

    pub fn on_age_fail(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_age_fail = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&VerificationError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }

    pub(crate) fn success(&self, event: &SuccessEvent) {
        if let Some(f) = &self.on_success {
            f(event);
        }
    }

    /// `on_age_pass` or `on_age_fail`.
    pub(crate) fn age(&self, passed: bool) {
        let f = if passed { &self.on_age_pass } else { &self.on_age_fail };
        if let Some(f) = f {
            f();
        }
    }

    pub(crate) fn error(&self, error: &VerificationError) {
        if let Some(f) = &self.on_error {
            f(error);
        }
    }

    pub(crate) fn cancel(&self) {
        if let Some(f) = &self.on_cancel {
            f();
        }
    }

    pub(crate) fn close(&self) {
        if let Some(f) = &self.on_close {
            f();
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_age_pass", &self.on_age_pass.is_some())
            .field("on_age_fail", &self.on_age_fail.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Non-terminal events forwarded from the surface.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoEvent {
    AppReady(InfoPayload),
    Progress(ProgressPayload),
    StateChange(StateChangePayload),
    UserAction(UserActionPayload),
}

/// Receives informational events for every attempt of an orchestrator.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &InfoEvent);
}

impl<F> Observer for F
where
    F: Fn(&InfoEvent) + Send + Sync,
{
    fn on_event(&self, event: &InfoEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn age_dispatch() {
        let passes = Arc::new(AtomicUsize::new(0));
        let fails = Arc::new(AtomicUsize::new(0));
        let (p, f) = (passes.clone(), fails.clone());
        let callbacks = Callbacks::new()
            .on_age_pass(move || {
                p.fetch_add(1, Ordering::SeqCst);
            })
            .on_age_fail(move || {
                f.fetch_add(1, Ordering::SeqCst);
            });

        callbacks.age(true);
        callbacks.age(false);
        callbacks.age(false);
        assert_eq!(passes.load(Ordering::SeqCst), 1);
        assert_eq!(fails.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_callbacks_are_skipped() {
        let callbacks = Callbacks::new();
        callbacks.cancel();
        callbacks.close();
        callbacks.error(&VerificationError::Launch("x".into()));
        assert!(format!("{callbacks:?}").contains("on_cancel: false"));
    }

    #[test]
    fn closures_are_observers() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();
        let observer: Arc<dyn Observer> = Arc::new(move |_: &InfoEvent| {
            s.fetch_add(1, Ordering::SeqCst);
        });
        observer.on_event(&InfoEvent::Progress(ProgressPayload::default()));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
