//! Records turned into display strings.
//!
//! Decoding never fails. Records that cannot be interpreted become
//! placeholders (`[empty record]`, `[unsupported <type>: <n> bytes]`) which
//! callers can tell apart through [`DecodedRecord::is_placeholder`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::{
    message::NdefMessage,
    record::{
        EXTERNAL_ANDROID_APP, MIME_VCARD, MIME_VCARD_LEGACY, MIME_WIFI, NdefRecord, RTD_SMART_POSTER,
        RTD_TEXT, RTD_URI, Tnf,
    },
    text, uri,
    vcard::Contact,
    wifi::WifiCredential,
};

/// Interpretation of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum DecodedRecord {
    Text { text: String },
    Uri { uri: String },
    AbsoluteUri { uri: String },
    Wifi(WifiCredential),
    Contact(Contact),
    MimeText { media_type: String, text: String },
    App { package: String },
    SmartPoster { uri: String, title: Option<String> },
    Empty,
    Unsupported { type_name: String, len: usize },
}

impl DecodedRecord {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Empty | Self::Unsupported { .. })
    }

    fn unsupported(record: &NdefRecord) -> Self {
        Self::Unsupported {
            type_name: record.type_name(),
            len: record.payload.len(),
        }
    }
}

impl fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text } | Self::MimeText { text, .. } => f.write_str(text),
            Self::Uri { uri } | Self::AbsoluteUri { uri } => f.write_str(uri),
            Self::Wifi(credential) => {
                write!(f, "WiFi: {} ({})", credential.ssid, credential.security)
            }
            Self::Contact(contact) => write!(f, "Contact: {}", contact.present_fields().join(", ")),
            Self::App { package } => write!(f, "App: {package}"),
            Self::SmartPoster { uri, title: None } => f.write_str(uri),
            Self::SmartPoster {
                uri,
                title: Some(title),
            } => write!(f, "{title} ({uri})"),
            Self::Empty => f.write_str("[empty record]"),
            Self::Unsupported { type_name, len } => {
                write!(f, "[unsupported {type_name}: {len} bytes]")
            }
        }
    }
}

/// Interpret a single record.
pub fn decode_record(record: &NdefRecord) -> DecodedRecord {
    match record.tnf {
        Tnf::Empty => DecodedRecord::Empty,
        Tnf::WellKnown if record.record_type == RTD_TEXT => match text::decode_payload(&record.payload) {
            Some(payload) => DecodedRecord::Text { text: payload.text },
            None => DecodedRecord::unsupported(record),
        },
        Tnf::WellKnown if record.record_type == RTD_URI => DecodedRecord::Uri {
            uri: uri::decode_payload(&record.payload),
        },
        Tnf::WellKnown if record.record_type == RTD_SMART_POSTER => {
            decode_smart_poster(&record.payload).unwrap_or_else(|| DecodedRecord::unsupported(record))
        }
        Tnf::AbsoluteUri => DecodedRecord::AbsoluteUri {
            uri: String::from_utf8_lossy(&record.record_type).into_owned(),
        },
        Tnf::Media => decode_media(record),
        Tnf::External if record.record_type == EXTERNAL_ANDROID_APP => DecodedRecord::App {
            package: String::from_utf8_lossy(&record.payload).into_owned(),
        },
        _ => DecodedRecord::unsupported(record),
    }
}

fn decode_media(record: &NdefRecord) -> DecodedRecord {
    let media_type = record.media_type().unwrap_or_default();
    let body = || String::from_utf8_lossy(&record.payload).into_owned();
    let mime_text = || DecodedRecord::MimeText {
        media_type: media_type.clone(),
        text: body(),
    };

    match media_type.as_str() {
        MIME_WIFI => WifiCredential::from_payload(&record.payload)
            .map(DecodedRecord::Wifi)
            .unwrap_or_else(|| DecodedRecord::unsupported(record)),
        MIME_VCARD | MIME_VCARD_LEGACY => Contact::parse(&body())
            .map(DecodedRecord::Contact)
            .unwrap_or_else(mime_text),
        t if t.starts_with("text/") => mime_text(),
        _ => DecodedRecord::unsupported(record),
    }
}

/// A smart poster nests a message holding one URI and optional titles.
fn decode_smart_poster(payload: &[u8]) -> Option<DecodedRecord> {
    let nested = NdefMessage::parse(payload).ok()?;
    let uri = nested
        .records()
        .iter()
        .find(|r| r.is(Tnf::WellKnown, RTD_URI))
        .map(|r| uri::decode_payload(&r.payload))?;
    let title = nested
        .records()
        .iter()
        .filter(|r| r.is(Tnf::WellKnown, RTD_TEXT))
        .find_map(|r| text::decode_payload(&r.payload))
        .map(|p| p.text);
    Some(DecodedRecord::SmartPoster { uri, title })
}

/// Display strings for records, in order.
///
/// # Examples
///
/// ```
/// use tagkit_ndef::{decode, NdefRecord, Tnf};
///
/// let records = vec![
///     NdefRecord::uri("https://a.b"),
///     NdefRecord::new(Tnf::Unknown, Vec::<u8>::new(), vec![1u8, 2, 3]),
/// ];
/// assert_eq!(decode(&records), vec!["https://a.b", "[unsupported unknown: 3 bytes]"]);
/// ```
pub fn decode(records: &[NdefRecord]) -> Vec<String> {
    records.iter().map(|r| decode_record(r).to_string()).collect()
}

/// Display strings for a raw message read from a tag.
///
/// No bytes means no records. A message that does not parse yields one
/// `[malformed NDEF message: <n> bytes]` placeholder.
pub fn decode_bytes(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }
    match NdefMessage::parse(bytes) {
        Ok(message) => decode(message.records()),
        Err(e) => {
            warn!(len = bytes.len(), error = %e, "Failed to parse NDEF message");
            vec![format!("[malformed NDEF message: {} bytes]", bytes.len())]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wifi::WifiSecurity;
    use rstest::rstest;

    #[test]
    fn test_text_and_uri() {
        assert_eq!(decode_record(&NdefRecord::text("Hello", "en")).to_string(), "Hello");
        assert_eq!(
            decode_record(&NdefRecord::uri("https://example.com")).to_string(),
            "https://example.com"
        );
    }

    #[test]
    fn test_wifi_display() {
        let credential = WifiCredential {
            ssid: "Home".to_string(),
            password: "secret".to_string(),
            security: WifiSecurity::Wpa,
        };
        let record = NdefRecord::mime(MIME_WIFI, credential.to_payload().unwrap());
        assert_eq!(decode_record(&record).to_string(), "WiFi: Home (WPA)");
    }

    #[test]
    fn test_contact_display() {
        let card = Contact::new("Jane", "+1", "jane@x.io").to_vcard();
        let record = NdefRecord::mime("text/x-vcard", card.into_bytes());
        assert_eq!(decode_record(&record).to_string(), "Contact: Jane, +1, jane@x.io");
    }

    #[test]
    fn test_app_and_absolute_uri() {
        assert_eq!(
            decode_record(&NdefRecord::android_app("com.example.app")).to_string(),
            "App: com.example.app"
        );
        let record = NdefRecord::new(Tnf::AbsoluteUri, b"https://x.y/z".to_vec(), Vec::<u8>::new());
        assert_eq!(decode_record(&record).to_string(), "https://x.y/z");
    }

    #[test]
    fn test_smart_poster() {
        let nested = NdefMessage::new(vec![
            NdefRecord::uri("https://example.com"),
            NdefRecord::text("Example", "en"),
        ])
        .unwrap();
        let record = NdefRecord::new(
            Tnf::WellKnown,
            RTD_SMART_POSTER,
            nested.to_bytes().unwrap().to_vec(),
        );
        assert_eq!(decode_record(&record).to_string(), "Example (https://example.com)");
    }

    #[rstest]
    #[case(NdefRecord::empty(), "[empty record]")]
    #[case(NdefRecord::mime("image/png", vec![0u8; 4]), "[unsupported image/png: 4 bytes]")]
    #[case(NdefRecord::external("example.com:thing", vec![1u8]), "[unsupported example.com:thing: 1 bytes]")]
    #[case(NdefRecord::new(Tnf::WellKnown, RTD_TEXT, Vec::<u8>::new()), "[unsupported T: 0 bytes]")]
    #[case(NdefRecord::mime(MIME_WIFI, vec![0xFFu8]), "[unsupported application/vnd.wfa.wsc: 1 bytes]")]
    fn test_placeholders(#[case] record: NdefRecord, #[case] expected: &str) {
        let decoded = decode_record(&record);
        assert!(decoded.is_placeholder());
        assert_eq!(decoded.to_string(), expected);
    }

    #[test]
    fn test_mime_text_is_not_placeholder() {
        let decoded = decode_record(&NdefRecord::mime("text/plain", b"note".to_vec()));
        assert!(!decoded.is_placeholder());
        assert_eq!(decoded.to_string(), "note");
    }

    #[rstest]
    #[case(
        NdefRecord::uri("https://example.com"),
        serde_json::json!({"kind": "uri", "uri": "https://example.com"})
    )]
    #[case(
        NdefRecord::mime("text/plain", b"note".to_vec()),
        serde_json::json!({"kind": "mimeText", "mediaType": "text/plain", "text": "note"})
    )]
    #[case(
        NdefRecord::mime("image/png", vec![0u8; 4]),
        serde_json::json!({"kind": "unsupported", "typeName": "image/png", "len": 4})
    )]
    #[case(NdefRecord::empty(), serde_json::json!({"kind": "empty"}))]
    fn test_json_shape(#[case] record: NdefRecord, #[case] expected: serde_json::Value) {
        let decoded = decode_record(&record);
        assert_eq!(serde_json::to_value(&decoded).unwrap(), expected);
        assert_eq!(serde_json::from_value::<DecodedRecord>(expected).unwrap(), decoded);
    }

    #[test]
    fn test_wifi_json_flattens_credential() {
        let credential = WifiCredential::new("Home", "secret", WifiSecurity::Wpa2).unwrap();
        let record = NdefRecord::mime(MIME_WIFI, credential.to_payload().unwrap());
        assert_eq!(
            serde_json::to_value(decode_record(&record)).unwrap(),
            serde_json::json!({
                "kind": "wifi",
                "ssid": "Home",
                "password": "secret",
                "security": "WPA2"
            })
        );
    }

    #[test]
    fn test_decode_bytes() {
        assert!(decode_bytes(&[]).is_empty());
        assert_eq!(decode_bytes(&[0x91, 0x01]), vec!["[malformed NDEF message: 2 bytes]"]);

        let bytes = NdefMessage::single(NdefRecord::uri("https://a.b")).to_bytes().unwrap();
        assert_eq!(decode_bytes(&bytes), vec!["https://a.b"]);
    }
}
