//! NDEF record model.
//!
//! A record is a typed unit of data inside an NDEF message. Its meaning is
//! given by the Type Name Format (TNF) together with the type bytes:
//!
//! | TNF | Name         | Type field example          |
//! |-----|--------------|-----------------------------|
//! | 0   | Empty        | (none)                      |
//! | 1   | Well-known   | `T` (text), `U` (URI)       |
//! | 2   | Media        | `text/vcard`                |
//! | 3   | Absolute URI | `https://example.com/x`     |
//! | 4   | External     | `android.com:pkg`           |
//! | 5   | Unknown      | (none)                      |
//! | 6   | Unchanged    | (chunk continuation)        |
//! | 7   | Reserved     |                             |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{text, uri};

/// Well-known type for text records.
pub const RTD_TEXT: &[u8] = b"T";

/// Well-known type for URI records.
pub const RTD_URI: &[u8] = b"U";

/// Well-known type for smart poster records.
pub const RTD_SMART_POSTER: &[u8] = b"Sp";

/// External type of the Android Application Record.
pub const EXTERNAL_ANDROID_APP: &[u8] = b"android.com:pkg";

/// Media type of a Wi-Fi Simple Configuration credential.
pub const MIME_WIFI: &str = "application/vnd.wfa.wsc";

/// Media type used for contact cards.
pub const MIME_VCARD: &str = "text/vcard";

/// Legacy media type some writers still use for contact cards.
pub const MIME_VCARD_LEGACY: &str = "text/x-vcard";

/// Type Name Format of a record (3 bits of the header).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tnf {
    Empty = 0x00,
    WellKnown = 0x01,
    Media = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl Tnf {
    /// Decode the low three header bits.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0x00 => Self::Empty,
            0x01 => Self::WellKnown,
            0x02 => Self::Media,
            0x03 => Self::AbsoluteUri,
            0x04 => Self::External,
            0x05 => Self::Unknown,
            0x06 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Tnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::WellKnown => "well-known",
            Self::Media => "media",
            Self::AbsoluteUri => "absolute-uri",
            Self::External => "external",
            Self::Unknown => "unknown",
            Self::Unchanged => "unchanged",
            Self::Reserved => "reserved",
        };
        f.write_str(name)
    }
}

/// One NDEF record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdefRecord {
    pub tnf: Tnf,
    pub record_type: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    pub fn new(tnf: Tnf, record_type: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tnf,
            record_type: record_type.into(),
            id: None,
            payload: payload.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Vec<u8>>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The TNF-Empty record used to blank a tag.
    pub fn empty() -> Self {
        Self {
            tnf: Tnf::Empty,
            record_type: Vec::new(),
            id: None,
            payload: Vec::new(),
        }
    }

    /// Well-known text record with the given language code, UTF-8 encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagkit_ndef::{NdefRecord, Tnf};
    ///
    /// let record = NdefRecord::text("Hello", "en");
    /// assert_eq!(record.tnf, Tnf::WellKnown);
    /// assert_eq!(record.payload, b"\x02enHello");
    /// ```
    pub fn text(text: &str, language: &str) -> Self {
        Self::new(Tnf::WellKnown, RTD_TEXT, text::encode_payload(text, language))
    }

    /// Well-known URI record, with the prefix abbreviated where possible.
    pub fn uri(uri: &str) -> Self {
        Self::new(Tnf::WellKnown, RTD_URI, uri::encode_payload(uri))
    }

    /// Media-type record.
    pub fn mime(media_type: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(Tnf::Media, media_type.as_bytes(), payload)
    }

    /// External-type record (`domain:type`).
    pub fn external(external_type: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(Tnf::External, external_type.as_bytes(), payload)
    }

    /// Android Application Record naming the package to launch.
    pub fn android_app(package: &str) -> Self {
        Self::new(Tnf::External, EXTERNAL_ANDROID_APP, package.as_bytes())
    }

    /// Whether this record has the given TNF and type.
    pub fn is(&self, tnf: Tnf, record_type: &[u8]) -> bool {
        self.tnf == tnf && self.record_type == record_type
    }

    /// Media type of a media record, lowercased.
    pub fn media_type(&self) -> Option<String> {
        (self.tnf == Tnf::Media)
            .then(|| String::from_utf8_lossy(&self.record_type).to_ascii_lowercase())
    }

    /// Human-readable type name, used for logs and placeholders.
    pub fn type_name(&self) -> String {
        if self.record_type.is_empty() {
            self.tnf.to_string()
        } else {
            String::from_utf8_lossy(&self.record_type).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tnf_bits_roundtrip() {
        for bits in 0u8..8 {
            assert_eq!(Tnf::from_bits(bits).bits(), bits);
        }
        // Header flags above the TNF bits are ignored
        assert_eq!(Tnf::from_bits(0xD1), Tnf::WellKnown);
    }

    #[test]
    fn test_uri_record_abbreviates_prefix() {
        let record = NdefRecord::uri("https://example.com");
        assert!(record.is(Tnf::WellKnown, RTD_URI));
        assert_eq!(record.payload[0], 0x04);
        assert_eq!(&record.payload[1..], b"example.com");
    }

    #[test]
    fn test_android_app_record() {
        let record = NdefRecord::android_app("com.example.app");
        assert!(record.is(Tnf::External, EXTERNAL_ANDROID_APP));
        assert_eq!(record.payload, b"com.example.app");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(NdefRecord::mime("Text/VCard", Vec::<u8>::new()).type_name(), "Text/VCard");
        assert_eq!(
            NdefRecord::mime("Text/VCard", Vec::<u8>::new()).media_type().as_deref(),
            Some("text/vcard")
        );
        assert_eq!(NdefRecord::empty().type_name(), "empty");
    }
}
