//! NFC sessions for the tagkit toolkit.
//!
//! This crate turns a platform adapter into a session-oriented service:
//!
//! - [`session`]: the Idle / Reading / Writing state machine and the
//!   single-shot write pipeline
//! - [`lifecycle`]: erase, format and permanent lock
//! - [`snapshot`]: decoding a discovered tag into a `TagSnapshot`
//! - [`events`]: fan-out delivery of discoveries, progress and results
//! - [`service`]: the `NfcService` facade and its discovery pump

pub mod config;
pub mod events;
pub mod lifecycle;
pub mod service;
pub mod session;
pub mod snapshot;

pub use config::SessionConfig;
pub use events::{EventChannel, EventFilter, EventKind, NfcEvent, Subscription};
pub use service::NfcService;
pub use session::SessionManager;
pub use snapshot::build_snapshot;
