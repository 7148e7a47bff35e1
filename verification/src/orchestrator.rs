//! The verification orchestrator: session reuse, agent bypass and the
//! attempt state machine driven by surface messages.

use crate::attempt::{AttemptHandle, AttemptResult, PendingAttempt};
use crate::callbacks::{Callbacks, InfoEvent, Observer, SuccessEvent};
use crate::config::GateConfig;
use crate::context::OrchestrationContext;
use crate::options::{LaunchMode, ValidateOptions};
use crate::state::AttemptPhase;
use crate::VerificationError;
use agegate_agent::{AgentClassifier, ClientSignals};
use agegate_messages::{
    ConfigPayload, ErrorPayload, InboundMessage, OutboundMessage, SuccessPayload,
};
use agegate_protocol::{
    build_launch_url, negotiate_locale, FrameTarget, LaunchParams, MessageChannel, RedirectUrls,
    TrustedOrigins,
};
use agegate_store::{CookieJar, SessionCache, SiteContext};
use agegate_surface::{clamp_height, DismissHandle, Layout, PresentationSurface, Viewport};
use agegate_token::TokenValidator;
use agegate_types::{Clock, Metadata, ReferenceId, Theme, Timestamp, VerificationIdentity};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use url::Url;

const FALLBACK_LOCALE: &str = "en";

/// Host primitives the orchestrator cannot run without.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Cross-frame messaging.
    pub messaging: bool,
    /// A document to mount the surface into.
    pub dom: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            messaging: true,
            dom: true,
        }
    }
}

/// Host collaborators, injected at construction.
#[derive(Clone)]
pub struct Deps {
    pub surface: Arc<dyn PresentationSurface>,
    pub frame: Arc<dyn FrameTarget>,
    pub cookies: Arc<dyn CookieJar>,
    pub site: SiteContext,
    pub clock: Arc<dyn Clock>,
    pub signals: Arc<dyn ClientSignals>,
    pub viewport: Viewport,
    pub capabilities: HostCapabilities,
}

/// Resolved options for one launch.
struct Prepared {
    mode: LaunchMode,
    theme: Theme,
    locale: String,
    metadata: Option<Metadata>,
    layout: Layout,
    callbacks: Callbacks,
    redirects: RedirectUrls,
}

/// The attempt this orchestrator launched and has not finished.
struct LiveAttempt {
    id: u64,
    callbacks: Callbacks,
    layout: Layout,
    config: ConfigPayload,
}

#[derive(Default)]
struct InstanceState {
    phase: AttemptPhase,
    live: Option<LiveAttempt>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notify {
    Cancel,
    Close,
}

enum Outcome {
    Resolved(SuccessEvent),
    Failed(VerificationError),
    Cancelled { reason: String, notify: Notify },
}

enum Start {
    Joined(AttemptHandle),
    Started(u64, AttemptHandle),
}

/// Drives verification for one asset.
///
/// Obtain instances through [`OrchestrationContext::get_or_create_instance`];
/// [`Orchestrator::new`] always builds a fresh, unregistered instance.
pub struct Orchestrator {
    me: Weak<Orchestrator>,
    identity: VerificationIdentity,
    config: Arc<GateConfig>,
    context: Arc<OrchestrationContext>,
    validator: TokenValidator,
    cache: SessionCache,
    classifier: AgentClassifier,
    channel: MessageChannel,
    surface: Arc<dyn PresentationSurface>,
    frame: Arc<dyn FrameTarget>,
    clock: Arc<dyn Clock>,
    signals: Arc<dyn ClientSignals>,
    viewport: Viewport,
    state: Mutex<InstanceState>,
    observers: Mutex<Vec<Arc<dyn Observer>>>,
}

impl Orchestrator {
    /// Build an orchestrator. Fails on an unusable host or configuration;
    /// these errors are fatal and meant to reach the embedding application.
    pub fn new(
        identity: VerificationIdentity,
        deps: Deps,
        config: Arc<GateConfig>,
        context: Arc<OrchestrationContext>,
    ) -> Result<Arc<Self>, VerificationError> {
        if !deps.capabilities.messaging {
            return Err(VerificationError::Environment(
                "cross-frame messaging is not available".into(),
            ));
        }
        if !deps.capabilities.dom {
            return Err(VerificationError::Environment("no document to mount into".into()));
        }
        config.validate()?;

        let validator = TokenValidator::new(config.validator_config()?);
        let channel = MessageChannel::new(
            TrustedOrigins::new(&config.trusted_origins, config.allow_local_origins),
            config.service_origin()?,
        );
        let cache = SessionCache::new(deps.cookies, deps.site, deps.clock.clone())
            .with_cookie_name(&config.cookie_name);
        let classifier =
            AgentClassifier::new(deps.clock.clone()).with_memo_window(config.agent_memo_secs);

        Ok(Arc::new_cyclic(|me| Self {
            me: me.clone(),
            identity,
            config,
            context,
            validator,
            cache,
            classifier,
            channel,
            surface: deps.surface,
            frame: deps.frame,
            clock: deps.clock,
            signals: deps.signals,
            viewport: deps.viewport,
            state: Mutex::new(InstanceState::default()),
            observers: Mutex::new(Vec::new()),
        }))
    }

    pub fn identity(&self) -> &VerificationIdentity {
        &self.identity
    }

    pub fn reference_id(&self) -> &ReferenceId {
        &self.identity.reference_id
    }

    pub fn phase(&self) -> AttemptPhase {
        self.state.lock().phase
    }

    pub fn is_open(&self) -> bool {
        self.surface.is_open()
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<OrchestrationContext> {
        &self.context
    }

    /// Register an observer for `appReady`, `progress`, `stateChange` and
    /// `userAction` events.
    pub fn observe(&self, observer: impl Observer + 'static) {
        self.observers.lock().push(Arc::new(observer));
    }

    /// Start verification without waiting for the outcome, which is only
    /// reported through the callbacks. Returns the reference id.
    pub fn validate(&self, options: ValidateOptions) -> Result<ReferenceId, VerificationError> {
        let prepared = self.prepare(options)?;
        if self.bypass_or_cached() {
            prepared.callbacks.age(true);
        } else {
            self.start(prepared);
        }
        Ok(self.identity.reference_id.clone())
    }

    /// Resolve `true` from a recognised agent or a valid cached session,
    /// otherwise launch (or join) an attempt and wait for it.
    ///
    /// Redirect mode resolves `false` once the page is navigating away.
    pub async fn validate_session(&self, options: ValidateOptions) -> Result<bool, VerificationError> {
        let prepared = self.prepare(options)?;
        if self.bypass_or_cached() {
            prepared.callbacks.age(true);
            return Ok(true);
        }
        self.start(prepared).outcome().await
    }

    /// Launch an attempt without consulting the session cache. Joins the
    /// in-flight attempt when there is one.
    pub fn launch(&self, options: ValidateOptions) -> Result<AttemptHandle, VerificationError> {
        let prepared = self.prepare(options)?;
        Ok(self.start(prepared))
    }

    /// Feed a raw cross-frame message. Returns whether it passed the origin
    /// and decoding checks.
    pub fn handle_message(&self, origin: &str, raw: &str) -> bool {
        match self.channel.receive(origin, raw) {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Force the in-flight attempt to `Cancelled` and close the surface,
    /// whichever instance launched it.
    pub fn close(&self) {
        if !self.cancel_pending("closed by caller") {
            self.surface.close();
        }
    }

    fn bypass_or_cached(&self) -> bool {
        if let Some(mode) = self.config.bypass_agents {
            if self.classifier.is_automated_agent(mode, self.signals.as_ref()) {
                tracing::info!(%mode, "automated agent bypasses verification");
                return true;
            }
        }
        self.has_valid_session()
    }

    fn has_valid_session(&self) -> bool {
        let Some(token) = self.cache.read() else {
            return false;
        };
        let validation = self
            .validator
            .validate(&token, &self.cache.site().host, self.clock.now());
        if validation.valid && validation.is_of_age {
            tracing::debug!("cached session accepted");
            return true;
        }
        match &validation.error {
            Some(e) => tracing::info!(kind = e.kind().as_str(), "cached session rejected"),
            None => tracing::info!("cached session is not of age"),
        }
        self.cache.clear();
        false
    }

    fn prepare(&self, options: ValidateOptions) -> Result<Prepared, VerificationError> {
        let metadata = match options.metadata {
            Some(value) => Some(Metadata::new(value)?),
            None => self.identity.metadata.clone(),
        };
        let requested = options
            .locale
            .unwrap_or_else(|| self.config.default_locale.clone());
        let fallback = self
            .config
            .supported_locales
            .first()
            .map(String::as_str)
            .unwrap_or(FALLBACK_LOCALE);
        let locale = negotiate_locale(
            &requested,
            &self.signals.languages(),
            &self.config.supported_locales,
            fallback,
        );
        let layout = Layout::choose(options.viewport.as_ref().unwrap_or(&self.viewport));

        Ok(Prepared {
            mode: options.mode,
            theme: options.theme.unwrap_or(self.config.default_theme),
            locale,
            metadata,
            layout,
            callbacks: options.callbacks,
            redirects: options.redirect_urls,
        })
    }

    fn launch_url(&self, prepared: &Prepared) -> Result<Url, VerificationError> {
        let params = LaunchParams {
            asset_id: self.identity.asset_id.clone(),
            reference_id: self.identity.reference_id.clone(),
            theme: prepared.theme,
            locale: prepared.locale.clone(),
            protocol_version: self.config.protocol_version,
            metadata: prepared.metadata.clone(),
            redirects: prepared.redirects.clone(),
            mode: prepared.mode.as_param(),
        };
        build_launch_url(&self.config.service_url, &params)
            .map_err(|e| VerificationError::Launch(e.to_string()))
    }

    fn start(&self, prepared: Prepared) -> AttemptHandle {
        if prepared.mode == LaunchMode::Redirect {
            let result = self.redirect(&prepared);
            if let Err(e) = &result {
                prepared.callbacks.error(e);
            }
            return AttemptHandle::settled(self.identity.reference_id.clone(), result);
        }

        let url = match self.launch_url(&prepared) {
            Ok(url) => url,
            Err(e) => {
                prepared.callbacks.error(&e);
                return AttemptHandle::settled(self.identity.reference_id.clone(), Err(e));
            }
        };

        let start = self.context.with_state(|state| {
            if let Some(pending) = &state.pending {
                return Start::Joined(pending.subscribe());
            }
            let id = state.next_attempt_id();
            let pending = PendingAttempt::new(
                id,
                self.identity.asset_id.clone(),
                self.identity.reference_id.clone(),
                self.me.clone(),
            );
            let handle = pending.subscribe();
            state.active_attempt = true;
            state.pending_reference_id = Some(self.identity.reference_id.clone());
            state.pending = Some(pending);
            Start::Started(id, handle)
        });
        let (id, handle) = match start {
            Start::Joined(handle) => {
                tracing::debug!(
                    reference_id = %handle.reference_id(),
                    "joining in-flight verification attempt"
                );
                return handle;
            }
            Start::Started(id, handle) => (id, handle),
        };

        let layout = prepared.layout;
        {
            let mut state = self.state.lock();
            state.phase = AttemptPhase::Launching;
            state.live = Some(LiveAttempt {
                id,
                layout,
                config: ConfigPayload {
                    asset_id: self.identity.asset_id.to_string(),
                    reference_id: self.identity.reference_id.to_string(),
                    theme: prepared.theme,
                    locale: prepared.locale,
                    metadata: prepared.metadata.map(|m| m.value().clone()),
                    protocol_version: self.config.protocol_version,
                    layout: layout.hint(),
                },
                callbacks: prepared.callbacks,
            });
        }

        tracing::info!(
            reference_id = %self.identity.reference_id,
            ?layout,
            "launching verification"
        );
        match self.surface.open(&url, layout, self.dismiss_handle(id)) {
            Ok(()) => {
                let mut state = self.state.lock();
                let current = state.live.as_ref().map(|l| l.id) == Some(id);
                if current && state.phase.can_transition_to(AttemptPhase::AwaitingRemote) {
                    state.phase = AttemptPhase::AwaitingRemote;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "verification surface failed to open");
                if let Some(live) = self.claim(Some(id), AttemptPhase::Failed) {
                    self.finish(live, Outcome::Failed(VerificationError::Launch(e.to_string())));
                }
            }
        }
        handle
    }

    fn redirect(&self, prepared: &Prepared) -> AttemptResult {
        if prepared.redirects.success_url.is_none() {
            return Err(VerificationError::Configuration(
                "redirect mode requires a success_url".into(),
            ));
        }
        let url = self.launch_url(prepared)?;
        // The page navigates away, taking any mounted surface with it.
        self.cancel_pending("superseded by redirect");
        tracing::info!(reference_id = %self.identity.reference_id, "redirecting to verification");
        self.surface
            .redirect(&url)
            .map_err(|e| VerificationError::Launch(e.to_string()))?;
        Ok(false)
    }

    fn dismiss_handle(&self, attempt_id: u64) -> DismissHandle {
        let me = self.me.clone();
        DismissHandle::new(move || {
            if let Some(orchestrator) = me.upgrade() {
                orchestrator.cancel(Some(attempt_id), "dismissed by user".into(), Notify::Close);
            }
        })
    }

    fn dispatch(&self, message: InboundMessage) {
        match message {
            InboundMessage::Ready => self.on_ready(),
            InboundMessage::AppReady(p) => self.notify(InfoEvent::AppReady(p)),
            InboundMessage::Progress(p) => self.notify(InfoEvent::Progress(p)),
            InboundMessage::StateChange(p) => self.notify(InfoEvent::StateChange(p)),
            InboundMessage::UserAction(p) => self.notify(InfoEvent::UserAction(p)),
            InboundMessage::Resize(p) => self.on_resize(p.height),
            InboundMessage::Success(p) => self.on_success(p),
            InboundMessage::Error(ErrorPayload { code, message }) => {
                if let Some(live) = self.claim(None, AttemptPhase::Failed) {
                    self.finish(live, Outcome::Failed(VerificationError::Remote { code, message }));
                } else {
                    tracing::debug!("error after attempt ended, ignored");
                }
            }
            InboundMessage::Cancel(p) => {
                let reason = p.reason.unwrap_or_else(|| "cancelled by user".into());
                self.cancel(None, reason, Notify::Cancel);
            }
            InboundMessage::Close => {
                self.cancel(None, "surface closed".into(), Notify::Close);
            }
        }
    }

    fn notify(&self, event: InfoEvent) {
        let observers = self.observers.lock().clone();
        for observer in observers {
            observer.on_event(&event);
        }
    }

    fn on_ready(&self) {
        let config = {
            let state = self.state.lock();
            match &state.live {
                Some(live) => live.config.clone(),
                None => {
                    tracing::debug!("ready without a live attempt, ignored");
                    return;
                }
            }
        };
        if let Err(e) = self.channel.send(
            self.frame.as_ref(),
            &OutboundMessage::Config(config),
            self.clock.now(),
        ) {
            tracing::warn!(error = %e, "failed to post configuration to surface");
        }
        self.surface.hide_loading();
    }

    fn on_resize(&self, height: f64) {
        let layout = self.state.lock().live.as_ref().map(|l| l.layout);
        match layout {
            Some(layout) if layout.honours_resize() => {
                let px = clamp_height(
                    height,
                    self.config.min_frame_height,
                    self.config.max_frame_height,
                );
                self.surface.update_height(px);
            }
            _ => tracing::trace!(height, "resize ignored"),
        }
    }

    fn on_success(&self, payload: SuccessPayload) {
        let Some(live) = self.claim(None, AttemptPhase::Resolved) else {
            tracing::debug!("success after attempt ended, ignored");
            return;
        };
        let hint = payload
            .token
            .as_deref()
            .and_then(agegate_token::decode)
            .map(|claims| claims.age_assertion.is_of_age);
        let is_of_age = match payload.token.as_deref() {
            Some(token) => self.accept_token(token, payload.expires_at),
            None => false,
        };
        let event = SuccessEvent {
            reference_id: payload
                .reference_id
                .unwrap_or_else(|| self.identity.reference_id.to_string()),
            token: payload.token,
            is_of_age_hint: hint,
            is_of_age,
        };
        self.finish(live, Outcome::Resolved(event));
    }

    /// Validate and cache a token from the surface. Returns the validated
    /// age outcome.
    fn accept_token(&self, token: &str, expires_at: Option<u64>) -> bool {
        let now = self.clock.now();
        let validation = self.validator.validate(token, &self.cache.site().host, now);
        if !validation.valid {
            let kind = validation.error.as_ref().map(|e| e.kind().as_str());
            tracing::warn!(kind, "token from verification surface rejected");
            return false;
        }
        let expiry = expires_at.or_else(|| validation.claims.as_ref().map(|c| c.exp));
        let ttl = expiry.map(|exp| Timestamp::new(exp).secs_from(now));
        self.cache.store(token, ttl);
        validation.is_of_age
    }

    /// Returns whether a live attempt was cancelled.
    fn cancel(&self, attempt_id: Option<u64>, reason: String, notify: Notify) -> bool {
        match self.claim(attempt_id, AttemptPhase::Cancelled) {
            Some(live) => {
                self.finish(live, Outcome::Cancelled { reason, notify });
                true
            }
            None => false,
        }
    }

    /// Cancel the context's pending attempt through the instance that
    /// launched it. Returns whether an attempt was pending.
    fn cancel_pending(&self, reason: &str) -> bool {
        if self.cancel(None, reason.into(), Notify::Close) {
            return true;
        }
        let Some((id, owner)) = self.context.pending_owner() else {
            return false;
        };
        match owner.upgrade() {
            Some(owner) => {
                owner.cancel(Some(id), reason.into(), Notify::Close);
            }
            None => {
                self.surface.close();
                self.context.settle(
                    id,
                    Err(VerificationError::Cancelled {
                        reason: reason.into(),
                    }),
                );
            }
        }
        true
    }

    /// Move the live attempt into a terminal phase and take ownership of it.
    /// `None` when there is no matching live attempt, which makes every
    /// terminal path idempotent.
    fn claim(&self, attempt_id: Option<u64>, phase: AttemptPhase) -> Option<LiveAttempt> {
        let mut state = self.state.lock();
        let matches = match (&state.live, attempt_id) {
            (Some(live), Some(id)) => live.id == id,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if !matches || !state.phase.can_transition_to(phase) {
            return None;
        }
        state.phase = phase;
        state.live.take()
    }

    /// Settle the attempt, then notify the caller's callbacks. Callbacks run
    /// with the attempt already cleared so they can start a new one.
    fn finish(&self, live: LiveAttempt, outcome: Outcome) {
        self.surface.close();

        let result = match &outcome {
            Outcome::Resolved(event) => Ok(event.is_of_age),
            Outcome::Failed(error) => Err(error.clone()),
            Outcome::Cancelled { reason, .. } => Err(VerificationError::Cancelled {
                reason: reason.clone(),
            }),
        };

        tracing::info!(
            reference_id = %self.identity.reference_id,
            phase = %self.phase(),
            "verification attempt finished"
        );
        self.context.settle(live.id, result);
        {
            let mut state = self.state.lock();
            if state.live.is_none() && state.phase.can_transition_to(AttemptPhase::Idle) {
                state.phase = AttemptPhase::Idle;
            }
        }

        match outcome {
            Outcome::Resolved(event) => {
                live.callbacks.success(&event);
                live.callbacks.age(event.is_of_age_hint.unwrap_or(false));
            }
            Outcome::Failed(error) => live.callbacks.error(&error),
            Outcome::Cancelled { notify: Notify::Cancel, .. } => live.callbacks.cancel(),
            Outcome::Cancelled { notify: Notify::Close, .. } => live.callbacks.close(),
        }
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("asset_id", &self.identity.asset_id)
            .field("reference_id", &self.identity.reference_id)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
