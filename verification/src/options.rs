//! Per-call launch options.

use crate::callbacks::Callbacks;
use agegate_protocol::RedirectUrls;
use agegate_surface::Viewport;
use agegate_types::Theme;

/// How the verification surface is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LaunchMode {
    /// Embedded overlay or full-screen frame.
    #[default]
    Modal,
    /// Navigate the whole page to the service; it returns via `success_url`.
    Redirect,
}

impl LaunchMode {
    /// Value of the launch URL's `mode` parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            LaunchMode::Modal => "embedded",
            LaunchMode::Redirect => "redirect",
        }
    }
}

/// Overrides for one validation call. Unset fields use the gate's
/// configuration and the orchestrator's identity.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    pub mode: LaunchMode,
    pub theme: Option<Theme>,
    /// A locale tag or `"auto"`.
    pub locale: Option<String>,
    /// Replaces the identity's metadata for this call. Same size limit.
    pub metadata: Option<serde_json::Value>,
    /// Viewport at call time; defaults to the host's.
    pub viewport: Option<Viewport>,
    pub callbacks: Callbacks,
    pub redirect_urls: RedirectUrls,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirect(success_url: impl Into<String>) -> Self {
        Self {
            mode: LaunchMode::Redirect,
            redirect_urls: RedirectUrls {
                success_url: Some(success_url.into()),
                ..RedirectUrls::default()
            },
            ..Self::default()
        }
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }
}
