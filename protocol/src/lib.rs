//! Cross-frame protocol: envelope codec, origin trust, the message channel,
//! launch URL construction, locale negotiation and versioning.

pub mod channel;
pub mod codec;
pub mod error;
pub mod launch;
pub mod locale;
pub mod origins;
pub mod version;

pub use channel::{FrameTarget, MessageChannel};
pub use error::ProtocolError;
pub use launch::{build_launch_url, LaunchParams, RedirectUrls, ASSET_ID_PLACEHOLDER};
pub use locale::{negotiate_locale, AUTO_LOCALE};
pub use origins::{normalize_origin, TrustedOrigins};
pub use version::PROTOCOL_VERSION;
