use agegate_messages::{ConfigPayload, InboundMessage, LayoutHint, OutboundMessage};
use agegate_nullables::NullFrame;
use agegate_protocol::{MessageChannel, ProtocolError, TrustedOrigins, PROTOCOL_VERSION};
use agegate_types::{Theme, Timestamp};

const SERVICE: &str = "https://verify.agegate.example";

fn channel(allow_local: bool) -> MessageChannel {
    MessageChannel::new(TrustedOrigins::new([SERVICE], allow_local), SERVICE)
}

fn config() -> OutboundMessage {
    OutboundMessage::Config(ConfigPayload {
        asset_id: "asset-1".into(),
        reference_id: "ref-1".into(),
        theme: Theme::Dark,
        locale: "en".into(),
        metadata: None,
        protocol_version: PROTOCOL_VERSION,
        layout: LayoutHint::Overlay,
    })
}

#[test]
fn send_posts_to_service_origin() {
    let frame = NullFrame::new();
    channel(false)
        .send(&frame, &config(), Timestamp::new(1_700_000_000))
        .unwrap();

    let posted = frame.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].1, SERVICE);

    let json = &frame.posted_json()[0];
    assert_eq!(json["type"], "config");
    assert_eq!(json["data"]["assetId"], "asset-1");
    assert_eq!(json["data"]["theme"], "dark");
    assert_eq!(json["timestamp"], 1_700_000_000_000u64);
}

#[test]
fn send_surfaces_post_failures() {
    let frame = NullFrame::new();
    frame.fail_posts(true);
    let err = channel(false)
        .send(&frame, &config(), Timestamp::new(1))
        .unwrap_err();
    assert!(matches!(err, ProtocolError::PostFailed(_)));
}

#[test]
fn trusted_origin_messages_are_delivered() {
    let ch = channel(false);
    assert_eq!(
        ch.receive("https://verify.agegate.example:443", r#"{"type":"ready"}"#),
        Some(InboundMessage::Ready)
    );
}

#[test]
fn untrusted_origin_messages_are_dropped() {
    let ch = channel(false);
    let success = r#"{"type":"success","data":{"token":"t"}}"#;
    assert_eq!(ch.receive("https://evil.example", success), None);
    assert_eq!(ch.receive("http://verify.agegate.example", success), None);
    assert_eq!(ch.receive("http://localhost:3000", success), None);
    assert_eq!(ch.receive("null", success), None);
}

#[test]
fn local_origins_when_allowed() {
    let ch = channel(true);
    assert_eq!(
        ch.receive("http://localhost:3000", r#"{"type":"close"}"#),
        Some(InboundMessage::Close)
    );
    assert_eq!(
        ch.receive("http://127.0.0.1:8080", r#"{"type":"close"}"#),
        Some(InboundMessage::Close)
    );
    assert_eq!(ch.receive("https://evil.example", r#"{"type":"close"}"#), None);
}

#[test]
fn undecodable_messages_are_dropped() {
    let ch = channel(false);
    for raw in ["", "not json", r#"{"type":"teleport"}"#, r#"{"type":"config"}"#, r#"{"data":{}}"#] {
        assert_eq!(ch.receive(SERVICE, raw), None, "{raw}");
    }
}
