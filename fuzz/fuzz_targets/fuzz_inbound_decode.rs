#![no_main]

use agegate_messages::MessageKind;
use agegate_protocol::codec::decode_inbound;
use agegate_protocol::{MessageChannel, TrustedOrigins};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding arbitrary text never panics; anything accepted is not `config`.
    if let Ok(message) = decode_inbound(raw) {
        assert_ne!(message.kind(), MessageKind::Config);
    }

    // Untrusted origins never get through, whatever the payload.
    let channel = MessageChannel::new(
        TrustedOrigins::new(["https://verify.agegate.example"], false),
        "https://verify.agegate.example",
    );
    assert!(channel.receive("https://attacker.example", raw).is_none());
    let _ = channel.receive("https://verify.agegate.example", raw);
});
