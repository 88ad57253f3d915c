//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tagkit_core::constants::DEFAULT_ACK_TIMEOUT_MS;

/// Configuration for a [`SessionManager`](crate::SessionManager).
///
/// # Example
///
/// ```
/// use tagkit_session::SessionConfig;
///
/// let config = SessionConfig {
///     ack_timeout_ms: 500,
/// };
/// assert_eq!(config.ack_timeout().as_millis(), 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// How long to wait for the platform to acknowledge a reader-mode change.
    pub ack_timeout_ms: u64,
}

impl SessionConfig {
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ack_timeout_ms: DEFAULT_ACK_TIMEOUT_MS,
        }
    }
}
