use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Write intent validation
    #[error("Missing required field '{field}' for {template} template")]
    InvalidTemplate { template: String, field: String },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    // NDEF wire format
    #[error("Malformed NDEF message: {0}")]
    MalformedNdef(String),

    // Tag operations
    #[error("Tag read failed: {0}")]
    TagRead(String),

    #[error("Tag write failed: {0}")]
    TagWrite(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Tag is not NDEF formatted")]
    NotNdef,

    #[error("Tag is read-only")]
    ReadOnly,

    #[error("Tag is already read-only")]
    AlreadyReadOnly,

    #[error("Message too large: {required} bytes exceeds tag capacity of {capacity} bytes")]
    CapacityExceeded { required: usize, capacity: usize },

    // Session control
    #[error("Session conflict: {active} session is active")]
    SessionConflict { active: String },

    #[error("NFC adapter error: {0}")]
    Adapter(String),

    #[error("NFC is not available on this device")]
    NfcUnavailable,
}

impl Error {
    /// Create a missing-field error for a template.
    pub fn invalid_template(template: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.into(),
            field: field.into(),
        }
    }

    /// Create an invalid field value error.
    pub fn invalid_field_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed NDEF error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedNdef(message.into())
    }

    /// Classify this error for a failed [`WriteResult`](crate::WriteResult).
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::InvalidTemplate { .. } | Self::InvalidFieldValue { .. } => {
                FailureKind::InvalidTemplate
            }
            Self::TagRead(_) => FailureKind::TagLost,
            Self::NotNdef | Self::MalformedNdef(_) => FailureKind::NotNdef,
            Self::ReadOnly => FailureKind::ReadOnly,
            Self::AlreadyReadOnly => FailureKind::AlreadyReadOnly,
            Self::CapacityExceeded { .. } => FailureKind::CapacityExceeded,
            Self::UnsupportedOperation(_) => FailureKind::Unsupported,
            Self::TagWrite(_)
            | Self::SessionConflict { .. }
            | Self::Adapter(_)
            | Self::NfcUnavailable => FailureKind::Hardware,
        }
    }

    /// Whether the tag was still reachable when this error happened.
    ///
    /// A lost tag has no meaningful id to report back.
    pub fn tag_contacted(&self) -> bool {
        !matches!(self, Self::TagRead(_))
    }
}

/// Machine-readable reason attached to a failed write result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    InvalidTemplate,
    TagLost,
    NotNdef,
    ReadOnly,
    AlreadyReadOnly,
    CapacityExceeded,
    Unsupported,
    Hardware,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_template_message() {
        let error = Error::invalid_template("TEXT", "text");
        assert_eq!(
            error.to_string(),
            "Missing required field 'text' for TEXT template"
        );
        assert_eq!(error.failure_kind(), FailureKind::InvalidTemplate);
    }

    #[test]
    fn test_already_read_only_is_distinct() {
        assert_ne!(
            Error::AlreadyReadOnly.failure_kind(),
            Error::TagWrite("io".into()).failure_kind()
        );
        assert_eq!(Error::AlreadyReadOnly.to_string(), "Tag is already read-only");
    }

    #[test]
    fn test_capacity_message() {
        let error = Error::CapacityExceeded {
            required: 200,
            capacity: 137,
        };
        assert_eq!(
            error.to_string(),
            "Message too large: 200 bytes exceeds tag capacity of 137 bytes"
        );
    }

    #[test]
    fn test_tag_contacted() {
        assert!(!Error::TagRead("removed".into()).tag_contacted());
        assert!(Error::ReadOnly.tag_contacted());
    }
}
