//! The presentation surface hosting the remote verification app.
//!
//! Implementations own the modal/iframe lifecycle. The orchestrator relies on
//! this contract:
//! - `open` either mounts exactly one surface or fails without leaving
//!   anything mounted;
//! - `close` runs the exit animation before teardown and always restores the
//!   page scroll lock and removes the dismissal key handler;
//! - only explicit dismissal (the close control, or Escape on
//!   [`Layout::Overlay`]) invokes the [`DismissHandle`]. A click on the
//!   backdrop never closes the surface.

use agegate_messages::LayoutHint;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Widths at or below this are presented full-screen.
pub const COMPACT_MAX_WIDTH: u32 = 768;

/// Default bounds applied to `resize` requests.
pub const DEFAULT_MIN_HEIGHT: u32 = 400;
pub const DEFAULT_MAX_HEIGHT: u32 = 900;

const MOBILE_UA_MARKERS: &[&str] = &[
    "mobi", "android", "iphone", "ipad", "ipod", "silk", "kindle", "opera mini", "iemobile",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The environment refused to present (e.g. blocked popup).
    #[error("surface blocked: {0}")]
    Blocked(String),

    #[error("surface failed: {0}")]
    Failed(String),
}

/// What the host knows about the viewport at open time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub touch: bool,
    pub user_agent: String,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            touch: false,
            user_agent: String::new(),
        }
    }
}

/// How the surface is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Full-viewport takeover for narrow or touch devices.
    Compact,
    /// Centered overlay with an embedded frame.
    #[default]
    Overlay,
}

impl Layout {
    /// Pick a layout. Wide touch devices are treated as compact.
    pub fn choose(viewport: &Viewport) -> Layout {
        let ua = viewport.user_agent.to_ascii_lowercase();
        let mobile_ua = MOBILE_UA_MARKERS.iter().any(|m| ua.contains(m));
        if viewport.width <= COMPACT_MAX_WIDTH || viewport.touch || mobile_ua {
            Layout::Compact
        } else {
            Layout::Overlay
        }
    }

    /// Escape dismisses only the overlay.
    pub fn dismiss_on_escape(&self) -> bool {
        matches!(self, Layout::Overlay)
    }

    /// Resize requests only apply to the overlay.
    pub fn honours_resize(&self) -> bool {
        matches!(self, Layout::Overlay)
    }

    pub fn hint(&self) -> LayoutHint {
        match self {
            Layout::Compact => LayoutHint::Compact,
            Layout::Overlay => LayoutHint::Overlay,
        }
    }
}

/// Clamp a requested frame height into `[min, max]` pixels.
pub fn clamp_height(requested: f64, min: u32, max: u32) -> u32 {
    if !requested.is_finite() {
        return min;
    }
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    (requested.round().max(0.0) as u64).clamp(lo as u64, hi as u64) as u32
}

/// Called by the surface when the user explicitly dismisses it.
#[derive(Clone)]
pub struct DismissHandle(Arc<dyn Fn() + Send + Sync>);

impl DismissHandle {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn dismiss(&self) {
        (self.0)()
    }
}

impl fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DismissHandle")
    }
}

/// The visible modal/iframe hosting the remote surface.
pub trait PresentationSurface: Send + Sync {
    /// Mount the surface at `url`. Fails without mounting anything.
    fn open(&self, url: &Url, layout: Layout, on_dismiss: DismissHandle) -> Result<(), SurfaceError>;

    /// Animate out and tear down. No-op when closed.
    fn close(&self);

    fn is_open(&self) -> bool;

    /// Apply an already-clamped frame height.
    fn update_height(&self, px: u32);

    fn hide_loading(&self);

    /// Navigate the top-level page to `url` instead of mounting a frame.
    fn redirect(&self, url: &Url) -> Result<(), SurfaceError>;
}
