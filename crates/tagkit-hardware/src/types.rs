//! Types shared by adapter and tag implementations.

use serde::{Deserialize, Serialize};

/// NFC adapter information.
///
/// Contains adapter metadata such as its name and the radio technologies
/// it can poll for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterInfo {
    /// Adapter name (e.g., "Android NfcAdapter", "Mock NFC Adapter").
    pub name: String,

    /// Polled technologies (e.g., ["NFC_A", "NFC_B", "NFC_F", "NFC_V"]).
    pub technologies: Vec<String>,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl AdapterInfo {
    pub fn new(name: impl Into<String>, technologies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            technologies,
            firmware_version: None,
        }
    }

    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// What an NDEF tag allows, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdefCapabilities {
    /// Largest NDEF message the tag can hold, in bytes.
    pub max_size: usize,

    /// Whether the tag accepts writes.
    pub writable: bool,

    /// Whether the tag supports a permanent lock.
    pub can_make_read_only: bool,
}
