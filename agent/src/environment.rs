//! Headless-execution heuristics.

use crate::{ClientSignals, GraphicsInfo};

/// Vendor/renderer fragments produced by software rasterisers that headless
/// runners fall back to.
pub const SOFTWARE_RENDERERS: &[&str] = &[
    "swiftshader",
    "llvmpipe",
    "softpipe",
    "mesa offscreen",
    "brian paul",
    "microsoft basic render",
];

/// Which environment check fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadlessSignal {
    NoPlugins,
    NoLanguages,
    SoftwareRenderer,
}

/// Whether a graphics pair identifies software rendering.
pub fn is_software_renderer(graphics: &GraphicsInfo) -> bool {
    let combined = format!("{} {}", graphics.vendor, graphics.renderer).to_ascii_lowercase();
    SOFTWARE_RENDERERS.iter().any(|r| combined.contains(r))
}

/// First headless signal found, checking cheapest first.
pub fn headless_signal(signals: &dyn ClientSignals) -> Option<HeadlessSignal> {
    if signals.plugin_count() == Some(0) {
        return Some(HeadlessSignal::NoPlugins);
    }
    if signals.languages().is_empty() {
        return Some(HeadlessSignal::NoLanguages);
    }
    match signals.graphics() {
        Some(g) if is_software_renderer(&g) => Some(HeadlessSignal::SoftwareRenderer),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientProfile;

    fn desktop() -> ClientProfile {
        ClientProfile::browser("Mozilla/5.0")
    }

    #[test]
    fn ordinary_browser_is_not_headless() {
        assert_eq!(headless_signal(&desktop()), None);
    }

    #[test]
    fn zero_plugins_fires_first() {
        let mut p = desktop();
        p.plugin_count = Some(0);
        p.languages.clear();
        assert_eq!(headless_signal(&p), Some(HeadlessSignal::NoPlugins));
    }

    #[test]
    fn unknown_plugin_count_is_not_a_signal() {
        let mut p = desktop();
        p.plugin_count = None;
        assert_eq!(headless_signal(&p), None);
    }

    #[test]
    fn empty_languages() {
        let mut p = desktop();
        p.languages.clear();
        assert_eq!(headless_signal(&p), Some(HeadlessSignal::NoLanguages));
    }

    #[test]
    fn swiftshader_renderer() {
        let mut p = desktop();
        p.graphics = Some(GraphicsInfo {
            vendor: "Google Inc. (Google)".into(),
            renderer: "ANGLE (Google, Vulkan 1.3.0 (SwiftShader Device (Subzero)), SwiftShader driver)".into(),
        });
        assert_eq!(headless_signal(&p), Some(HeadlessSignal::SoftwareRenderer));
    }
}
