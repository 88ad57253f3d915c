//! Constants shared by the codec, the session layer and clients.
//!
//! Template field names are the keys a client puts in
//! [`WriteTemplate::fields`](crate::WriteTemplate); the codec looks them up
//! by these exact names.

// ============================================================================
// Template field names
// ============================================================================

pub const FIELD_TEXT: &str = "text";
pub const FIELD_URL: &str = "url";
pub const FIELD_SSID: &str = "ssid";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_SECURITY: &str = "security";
pub const FIELD_NAME: &str = "name";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_SUBJECT: &str = "subject";
pub const FIELD_BODY: &str = "body";
pub const FIELD_PACKAGE: &str = "package";

// ============================================================================
// Session defaults
// ============================================================================

/// Default bound on waiting for the platform to acknowledge a start/stop
/// request, in milliseconds.
pub const DEFAULT_ACK_TIMEOUT_MS: u64 = 3000;

/// Default capacity of the platform discovery channel used by mock adapters.
pub const DEFAULT_DISCOVERY_BUFFER: usize = 32;
