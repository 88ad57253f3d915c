//! Text record payloads.
//!
//! ```text
//! ┌─────────────┬──────────────────┬──────────────┐
//! │ status byte │ language code    │ text         │
//! │ UTF16|len   │ ASCII, len bytes │ UTF-8 or -16 │
//! └─────────────┴──────────────────┴──────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Language code written when the caller does not pick one.
pub const DEFAULT_LANGUAGE: &str = "en";

const STATUS_UTF16: u8 = 0x80;
const LANGUAGE_LEN_MASK: u8 = 0x3F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

/// A decoded text record body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPayload {
    pub encoding: TextEncoding,
    pub language: String,
    pub text: String,
}

/// Encode a UTF-8 text payload. Language codes longer than 63 bytes are cut.
pub fn encode_payload(text: &str, language: &str) -> Vec<u8> {
    let language = &language.as_bytes()[..language.len().min(LANGUAGE_LEN_MASK as usize)];
    let mut payload = Vec::with_capacity(1 + language.len() + text.len());
    payload.push(language.len() as u8);
    payload.extend_from_slice(language);
    payload.extend_from_slice(text.as_bytes());
    payload
}

/// Decode a text payload, or `None` if the status byte does not fit.
pub fn decode_payload(payload: &[u8]) -> Option<TextPayload> {
    let (&status, rest) = payload.split_first()?;
    let language_len = (status & LANGUAGE_LEN_MASK) as usize;
    if rest.len() < language_len {
        return None;
    }
    let (language, body) = rest.split_at(language_len);
    let language = String::from_utf8_lossy(language).into_owned();

    if status & STATUS_UTF16 != 0 {
        Some(TextPayload {
            encoding: TextEncoding::Utf16,
            language,
            text: decode_utf16(body),
        })
    } else {
        Some(TextPayload {
            encoding: TextEncoding::Utf8,
            language,
            text: String::from_utf8_lossy(body).into_owned(),
        })
    }
}

/// Big-endian unless a byte-order mark says otherwise.
fn decode_utf16(body: &[u8]) -> String {
    let (little_endian, body) = match body {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, body),
    };
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16_lossy(&units)
}
