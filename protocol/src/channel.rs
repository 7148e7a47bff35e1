//! The message channel between the gate and the embedded surface.

use crate::codec::{decode_inbound, encode_outbound};
use crate::{ProtocolError, TrustedOrigins};
use agegate_messages::{InboundMessage, OutboundMessage};
use agegate_types::Timestamp;

/// Where outbound messages are posted (the embedded frame's window).
pub trait FrameTarget: Send + Sync {
    fn post(&self, payload: &str, target_origin: &str) -> Result<(), ProtocolError>;
}

/// Origin-checked, typed messaging with the verification surface.
#[derive(Clone, Debug)]
pub struct MessageChannel {
    trusted: TrustedOrigins,
    target_origin: String,
}

impl MessageChannel {
    /// `target_origin` is the verification service origin outbound messages
    /// are addressed to.
    pub fn new(trusted: TrustedOrigins, target_origin: impl Into<String>) -> Self {
        Self {
            trusted,
            target_origin: target_origin.into(),
        }
    }

    pub fn is_trusted_origin(&self, origin: &str) -> bool {
        self.trusted.is_trusted(origin)
    }

    pub fn target_origin(&self) -> &str {
        &self.target_origin
    }

    /// Post a message to the surface.
    pub fn send(
        &self,
        target: &dyn FrameTarget,
        message: &OutboundMessage,
        now: Timestamp,
    ) -> Result<(), ProtocolError> {
        let payload = encode_outbound(message, now)?;
        target.post(&payload, &self.target_origin)?;
        tracing::debug!(kind = %message.kind(), "message posted to surface");
        Ok(())
    }

    /// Accept an inbound message. Messages from untrusted origins or that do
    /// not decode are dropped and never reach the caller.
    pub fn receive(&self, origin: &str, raw: &str) -> Option<InboundMessage> {
        if !self.is_trusted_origin(origin) {
            tracing::debug!(origin, "dropping message from untrusted origin");
            return None;
        }
        match decode_inbound(raw) {
            Ok(message) => {
                tracing::trace!(kind = %message.kind(), "message received");
                Some(message)
            }
            Err(e) => {
                tracing::warn!(origin, error = %e, "dropping undecodable message");
                None
            }
        }
    }
}
