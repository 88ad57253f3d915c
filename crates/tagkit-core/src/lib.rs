//! Shared types and the error taxonomy for the tagkit NFC toolkit.
//!
//! Everything that crosses a crate boundary lives here: tag snapshots,
//! write templates, write results, progress states and the [`Error`] type
//! every fallible operation in the workspace reports with.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, FailureKind, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
