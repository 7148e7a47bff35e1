//! What the classifier can observe about the client.

/// Graphics stack identification (unmasked WebGL vendor/renderer).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphicsInfo {
    pub vendor: String,
    pub renderer: String,
}

/// Client observations provided by the host environment.
pub trait ClientSignals: Send + Sync {
    fn user_agent(&self) -> String;

    /// Installed plugin count; `None` when the host cannot tell.
    fn plugin_count(&self) -> Option<usize>;

    fn languages(&self) -> Vec<String>;

    /// `None` when no graphics context could be created.
    fn graphics(&self) -> Option<GraphicsInfo>;

    /// Whether the client can persist the session cache.
    fn can_persist(&self) -> bool;
}

/// A plain snapshot of client signals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientProfile {
    pub user_agent: String,
    pub plugin_count: Option<usize>,
    pub languages: Vec<String>,
    pub graphics: Option<GraphicsInfo>,
    pub can_persist: bool,
}

impl ClientProfile {
    /// A profile for a user agent with otherwise ordinary browser signals.
    pub fn browser(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            plugin_count: Some(5),
            languages: vec!["en-US".to_string(), "en".to_string()],
            graphics: Some(GraphicsInfo {
                vendor: "Google Inc. (Apple)".to_string(),
                renderer: "ANGLE (Apple, Apple M1, OpenGL 4.1)".to_string(),
            }),
            can_persist: true,
        }
    }
}

impl ClientSignals for ClientProfile {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn plugin_count(&self) -> Option<usize> {
        self.plugin_count
    }

    fn languages(&self) -> Vec<String> {
        self.languages.clone()
    }

    fn graphics(&self) -> Option<GraphicsInfo> {
        self.graphics.clone()
    }

    fn can_persist(&self) -> bool {
        self.can_persist
    }
}
