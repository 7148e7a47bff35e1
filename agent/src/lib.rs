//! Automated-agent classification.
//!
//! Decides whether the current client is a crawler or headless runner that
//! may skip verification (link previews, search indexing). The result is
//! advisory: it only ever *permits* a bypass, it never blocks a user.
//!
//! Three primitive signals exist ([`Signal`]) and five modes compose them
//! ([`DetectionMode`]). Each primitive is a [`Detector`] and can be replaced.

pub mod classifier;
pub mod detector;
pub mod environment;
pub mod mode;
pub mod signals;
pub mod signatures;

pub use classifier::{AgentClassifier, DEFAULT_MEMO_WINDOW_SECS};
pub use detector::{Detector, EnvironmentDetector, SignatureDetector, StorageDetector};
pub use mode::{DetectionMode, Signal};
pub use signals::{ClientProfile, ClientSignals, GraphicsInfo};
