//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every host dependency of the gate (clock, cookie jar, presentation
//! surface, frame messaging, client signals) is abstracted behind a trait.
//! This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (including failure injection)
//! - Record what the gate did to them, for assertions
//!
//! It also holds [`TokenMinter`], the only token signer in the workspace,
//! standing in for the remote verification service.

pub mod clock;
pub mod cookies;
pub mod frame;
pub mod signals;
pub mod surface;
pub mod token;

pub use clock::NullClock;
pub use cookies::NullCookieJar;
pub use frame::NullFrame;
pub use signals::NullSignals;
pub use surface::NullSurface;
pub use token::{TokenMinter, TEST_ISSUER};
