//! Envelope encoding and typed decoding.

use crate::ProtocolError;
use agegate_messages::{Envelope, InboundMessage, MessageKind, OutboundMessage};
use agegate_types::Timestamp;
use serde::de::DeserializeOwned;

/// Maximum inbound message size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Decode a raw inbound message into its typed form.
pub fn decode_inbound(raw: &str) -> Result<InboundMessage, ProtocolError> {
    if raw.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: raw.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    let tag = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| ProtocolError::Malformed("missing type".into()))?
        .to_string();
    let envelope: Envelope =
        serde_json::from_value(value).map_err(|_| ProtocolError::UnknownType(tag))?;

    let data = envelope.data;
    let message = match envelope.kind {
        MessageKind::Ready => InboundMessage::Ready,
        MessageKind::AppReady => InboundMessage::AppReady(payload(data)?),
        MessageKind::Progress => InboundMessage::Progress(payload(data)?),
        MessageKind::StateChange => InboundMessage::StateChange(payload(data)?),
        MessageKind::UserAction => InboundMessage::UserAction(payload(data)?),
        MessageKind::Resize => InboundMessage::Resize(payload(data)?),
        MessageKind::Success => InboundMessage::Success(payload(data)?),
        MessageKind::Error => InboundMessage::Error(payload(data)?),
        MessageKind::Cancel => InboundMessage::Cancel(payload(data)?),
        MessageKind::Close => InboundMessage::Close,
        MessageKind::Config => {
            return Err(ProtocolError::UnexpectedKind(MessageKind::Config.to_string()))
        }
    };
    Ok(message)
}

/// Encode an outbound message, stamping it with `now` in milliseconds.
pub fn encode_outbound(message: &OutboundMessage, now: Timestamp) -> Result<String, ProtocolError> {
    let data = match message {
        OutboundMessage::Config(config) => serde_json::to_value(config),
    }
    .map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    let envelope = Envelope {
        kind: message.kind(),
        data,
        timestamp: Some(now.as_secs().saturating_mul(1000)),
    };
    serde_json::to_string(&envelope).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// A missing `data` field decodes as an empty object.
fn payload<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, ProtocolError> {
    let data = if data.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        data
    };
    serde_json::from_value(data).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agegate_messages::{ConfigPayload, LayoutHint, SuccessPayload};
    use agegate_types::Theme;

    #[test]
    fn decodes_success_with_token() {
        let raw = r#"{"type":"success","data":{"token":"a.b.c","expiresAt":1700000000},"timestamp":1}"#;
        assert_eq!(
            decode_inbound(raw).unwrap(),
            InboundMessage::Success(SuccessPayload {
                token: Some("a.b.c".into()),
                expires_at: Some(1_700_000_000),
                reference_id: None,
            })
        );
    }

    #[test]
    fn missing_data_is_empty_payload() {
        assert_eq!(decode_inbound(r#"{"type":"ready"}"#).unwrap(), InboundMessage::Ready);
        assert!(matches!(
            decode_inbound(r#"{"type":"cancel"}"#).unwrap(),
            InboundMessage::Cancel(_)
        ));
        match decode_inbound(r#"{"type":"error"}"#).unwrap() {
            InboundMessage::Error(e) => assert_eq!(e.code, "unknown"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_classified() {
        assert_eq!(
            decode_inbound(r#"{"type":"teleport","data":{}}"#),
            Err(ProtocolError::UnknownType("teleport".into()))
        );
    }

    #[test]
    fn malformed_inputs() {
        assert!(matches!(decode_inbound("not json"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(decode_inbound(r#"{"data":{}}"#), Err(ProtocolError::Malformed(_))));
        assert!(matches!(
            decode_inbound(r#"{"type":"resize","data":{"height":"tall"}}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn config_is_outbound_only() {
        assert!(matches!(
            decode_inbound(r#"{"type":"config","data":{}}"#),
            Err(ProtocolError::UnexpectedKind(_))
        ));
    }

    #[test]
    fn oversized_message_rejected() {
        let raw = format!(r#"{{"type":"ready","data":"{}"}}"#, "x".repeat(MAX_MESSAGE_SIZE));
        assert!(matches!(decode_inbound(&raw), Err(ProtocolError::MessageTooLarge { .. })));
    }

    #[test]
    fn encodes_config_envelope() {
        let msg = OutboundMessage::Config(ConfigPayload {
            asset_id: "asset".into(),
            reference_id: "ref".into(),
            theme: Theme::Dark,
            locale: "en".into(),
            metadata: None,
            protocol_version: 1,
            layout: LayoutHint::Overlay,
        });
        let encoded = encode_outbound(&msg, Timestamp::new(2)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["type"], "config");
        assert_eq!(value["timestamp"], 2000);
        assert_eq!(value["data"]["referenceId"], "ref");
        assert_eq!(value["data"]["theme"], "dark");
        assert_eq!(value["data"]["layout"], "overlay");
    }
}
