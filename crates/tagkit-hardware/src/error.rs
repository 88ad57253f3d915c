//! Error types for NFC platform operations.
//!
//! These errors describe what went wrong between the toolkit and the
//! platform NFC stack: the adapter going away, a tag leaving the field,
//! a tag refusing a write. They convert into [`tagkit_core::Error`] at the
//! session boundary.

/// Result type alias for platform operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while talking to the NFC adapter or a tag.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Adapter is gone or its discovery channel closed.
    #[error("Adapter disconnected: {device}")]
    Disconnected { device: String },

    /// Platform did not answer in time.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Operation is not supported by this tag or adapter.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// I/O with the tag failed while it was still in the field.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Tag left the field before the operation completed.
    #[error("Tag was removed from the field")]
    TagLost,

    /// Tag rejected a write because it is locked.
    #[error("Tag is read-only")]
    ReadOnly,

    /// Message does not fit the tag's NDEF area.
    #[error("Message of {required} bytes exceeds tag capacity of {capacity} bytes")]
    CapacityExceeded { required: usize, capacity: usize },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    pub fn capacity_exceeded(required: usize, capacity: usize) -> Self {
        Self::CapacityExceeded { required, capacity }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<HardwareError> for tagkit_core::Error {
    fn from(error: HardwareError) -> Self {
        use tagkit_core::Error;

        match error {
            HardwareError::TagLost => Error::TagRead(error.to_string()),
            HardwareError::ReadOnly => Error::ReadOnly,
            HardwareError::CapacityExceeded { required, capacity } => {
                Error::CapacityExceeded { required, capacity }
            }
            HardwareError::Unsupported { operation } => Error::UnsupportedOperation(operation),
            HardwareError::CommunicationError { message } => Error::TagWrite(message),
            HardwareError::Disconnected { .. }
            | HardwareError::Timeout { .. }
            | HardwareError::Other(_) => Error::Adapter(error.to_string()),
        }
    }
}
