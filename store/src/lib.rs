//! Session storage for AgeGate.
//!
//! The host environment exposes a cookie jar ([`CookieJar`]); the
//! [`SessionCache`] layers the scoping and expiry policy for the cached
//! verification token on top of it. The rest of the workspace depends only on
//! the cache, never on a concrete jar.

pub mod cookie;
pub mod error;
pub mod session;

pub use cookie::{Cookie, CookieJar, SameSite};
pub use error::StoreError;
pub use session::{SessionCache, SessionRecord, SiteContext, DEFAULT_COOKIE_NAME};
