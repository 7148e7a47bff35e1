//! Message types exchanged with the embedded verification surface.
//!
//! Every message travels in an [`Envelope`] `{type, data, timestamp}`. The
//! `type` tag is a closed enum ([`MessageKind`]) and each kind has a typed
//! payload, so protocol drift shows up as a compile error or a decode error,
//! never as a silently ignored string.

use agegate_types::Theme;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire tag of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    // Surface → gate: lifecycle
    Ready,
    AppReady,
    Progress,
    StateChange,
    UserAction,
    Resize,

    // Surface → gate: terminal
    Success,
    Error,
    Cancel,
    Close,

    // Gate → surface
    Config,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Ready => "ready",
            MessageKind::AppReady => "appReady",
            MessageKind::Progress => "progress",
            MessageKind::StateChange => "stateChange",
            MessageKind::UserAction => "userAction",
            MessageKind::Resize => "resize",
            MessageKind::Success => "success",
            MessageKind::Error => "error",
            MessageKind::Cancel => "cancel",
            MessageKind::Close => "close",
            MessageKind::Config => "config",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw wire envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub data: serde_json::Value,
    /// Sender clock, milliseconds since epoch. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Free-form informational payload (`appReady`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPayload {
    #[serde(default)]
    pub step: Option<String>,
    /// 0–100.
    #[serde(default)]
    pub percent: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateChangePayload {
    #[serde(default)]
    pub from: Option<String>,
    pub to: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserActionPayload {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResizePayload {
    /// Requested content height in CSS pixels.
    pub height: f64,
}

/// Terminal success. `token` is absent in deployments that fetch the result
/// out-of-band.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPayload {
    #[serde(default)]
    pub token: Option<String>,
    /// Token expiry, Unix seconds.
    #[serde(default)]
    pub expires_at: Option<u64>,
    #[serde(default)]
    pub reference_id: Option<String>,
}

/// Technical failure reported by the surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default = "default_error_code")]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

fn default_error_code() -> String {
    "unknown".to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelPayload {
    #[serde(default)]
    pub reason: Option<String>,
}

/// A message received from the verification surface.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundMessage {
    Ready,
    AppReady(InfoPayload),
    Progress(ProgressPayload),
    StateChange(StateChangePayload),
    UserAction(UserActionPayload),
    Resize(ResizePayload),
    Success(SuccessPayload),
    Error(ErrorPayload),
    Cancel(CancelPayload),
    Close,
}

impl InboundMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            InboundMessage::Ready => MessageKind::Ready,
            InboundMessage::AppReady(_) => MessageKind::AppReady,
            InboundMessage::Progress(_) => MessageKind::Progress,
            InboundMessage::StateChange(_) => MessageKind::StateChange,
            InboundMessage::UserAction(_) => MessageKind::UserAction,
            InboundMessage::Resize(_) => MessageKind::Resize,
            InboundMessage::Success(_) => MessageKind::Success,
            InboundMessage::Error(_) => MessageKind::Error,
            InboundMessage::Cancel(_) => MessageKind::Cancel,
            InboundMessage::Close => MessageKind::Close,
        }
    }

    /// Ends the attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InboundMessage::Success(_)
                | InboundMessage::Error(_)
                | InboundMessage::Cancel(_)
                | InboundMessage::Close
        )
    }

    /// Forwarded to observers without affecting orchestration.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            InboundMessage::AppReady(_)
                | InboundMessage::Progress(_)
                | InboundMessage::StateChange(_)
                | InboundMessage::UserAction(_)
        )
    }
}

/// Layout the surface is presented in, as told to the remote app.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutHint {
    /// Full-viewport takeover.
    Compact,
    /// Centered modal with an embedded frame.
    #[default]
    Overlay,
}

/// Configuration posted to the surface once it reports `ready`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPayload {
    pub asset_id: String,
    pub reference_id: String,
    pub theme: Theme,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub protocol_version: u16,
    pub layout: LayoutHint,
}

/// A message sent to the verification surface.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundMessage {
    Config(ConfigPayload),
}

impl OutboundMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            OutboundMessage::Config(_) => MessageKind::Config,
        }
    }
}
