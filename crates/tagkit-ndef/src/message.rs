//! NDEF message wire format.
//!
//! A message is a sequence of records, each laid out as:
//!
//! ```text
//! ┌────────┬──────────┬────────────────┬─────────┬──────┬────┬─────────┐
//! │ header │ type len │ payload len    │ id len  │ type │ id │ payload │
//! │ 1 byte │ 1 byte   │ 1 (SR) or 4    │ 0 or 1  │      │    │         │
//! └────────┴──────────┴────────────────┴─────────┴──────┴────┴─────────┘
//!
//! header: MB | ME | CF | SR | IL | TNF(3 bits)
//! ```
//!
//! `MB` marks the first record, `ME` the last. `SR` selects the one-byte
//! payload length, `IL` signals an id length byte. Chunked records (`CF`)
//! are rejected: no template writes them and the platform reassembles
//! chunks before handing a message over.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tagkit_core::{Error, Result};

use crate::record::{NdefRecord, Tnf};

const FLAG_MB: u8 = 0x80;
const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;

/// Largest payload that fits the short-record encoding.
const SHORT_RECORD_MAX: usize = u8::MAX as usize;

/// An ordered, non-empty list of NDEF records.
///
/// Deserializing goes through [`NdefMessage::new`], so an empty record list
/// is refused there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage")]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

#[derive(Deserialize)]
struct RawMessage {
    records: Vec<NdefRecord>,
}

impl TryFrom<RawMessage> for NdefMessage {
    type Error = Error;

    fn try_from(raw: RawMessage) -> Result<Self> {
        Self::new(raw.records)
    }
}

impl NdefMessage {
    /// Create a message from records.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedNdef` if `records` is empty.
    pub fn new(records: Vec<NdefRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::malformed("message must contain at least one record"));
        }
        Ok(Self { records })
    }

    /// Message holding a single record.
    pub fn single(record: NdefRecord) -> Self {
        Self {
            records: vec![record],
        }
    }

    /// The blank message written by erase and format: one TNF-Empty record.
    pub fn empty() -> Self {
        Self::single(NdefRecord::empty())
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<NdefRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the message only holds blank records.
    pub fn is_blank(&self) -> bool {
        self.records.iter().all(|r| r.tnf == Tnf::Empty)
    }

    /// Serialize to the NDEF binary layout.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedNdef` if a record type or id is longer than
    /// 255 bytes, or a payload does not fit a 32-bit length.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagkit_ndef::{NdefMessage, NdefRecord};
    ///
    /// let message = NdefMessage::single(NdefRecord::text("Hi", "en"));
    /// let bytes = message.to_bytes().unwrap();
    /// assert_eq!(&bytes[..], b"\xD1\x01\x05T\x02enHi");
    /// ```
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.encoded_len_hint());
        let last = self
            .records
            .len()
            .checked_sub(1)
            .ok_or_else(|| Error::malformed("message must contain at least one record"))?;

        for (index, record) in self.records.iter().enumerate() {
            let type_len = u8::try_from(record.record_type.len())
                .map_err(|_| Error::malformed("record type longer than 255 bytes"))?;
            let id_len = match &record.id {
                Some(id) => Some(
                    u8::try_from(id.len())
                        .map_err(|_| Error::malformed("record id longer than 255 bytes"))?,
                ),
                None => None,
            };
            let short = record.payload.len() <= SHORT_RECORD_MAX;

            let mut header = record.tnf.bits();
            if index == 0 {
                header |= FLAG_MB;
            }
            if index == last {
                header |= FLAG_ME;
            }
            if short {
                header |= FLAG_SR;
            }
            if id_len.is_some() {
                header |= FLAG_IL;
            }

            buf.put_u8(header);
            buf.put_u8(type_len);
            if short {
                buf.put_u8(record.payload.len() as u8);
            } else {
                let payload_len = u32::try_from(record.payload.len())
                    .map_err(|_| Error::malformed("payload exceeds 4 GiB"))?;
                buf.put_u32(payload_len);
            }
            if let Some(id_len) = id_len {
                buf.put_u8(id_len);
            }
            buf.put_slice(&record.record_type);
            if let Some(id) = &record.id {
                buf.put_slice(id);
            }
            buf.put_slice(&record.payload);
        }

        Ok(buf.freeze())
    }

    /// Encoded size in bytes, used for tag capacity checks.
    pub fn byte_len(&self) -> Result<usize> {
        Ok(self.to_bytes()?.len())
    }

    fn encoded_len_hint(&self) -> usize {
        self.records
            .iter()
            .map(|r| 7 + r.record_type.len() + r.id.as_ref().map_or(0, Vec::len) + r.payload.len())
            .sum()
    }

    /// Parse a message from the NDEF binary layout.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedNdef` when the input is empty or truncated,
    /// uses chunked records, has misplaced MB/ME flags, or carries bytes
    /// after the last record.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::malformed("empty input"));
        }

        let mut buf = bytes;
        let mut records = Vec::new();

        loop {
            let header = take_u8(&mut buf, "record header")?;
            let first = records.is_empty();

            if first && header & FLAG_MB == 0 {
                return Err(Error::malformed("first record is missing the MB flag"));
            }
            if !first && header & FLAG_MB != 0 {
                return Err(Error::malformed(format!(
                    "record {} repeats the MB flag",
                    records.len()
                )));
            }
            if header & FLAG_CF != 0 {
                return Err(Error::malformed("chunked records are not supported"));
            }

            let tnf = Tnf::from_bits(header);
            if tnf == Tnf::Unchanged {
                return Err(Error::malformed("unchanged TNF outside a chunk"));
            }

            let type_len = take_u8(&mut buf, "type length")? as usize;
            let payload_len = if header & FLAG_SR != 0 {
                take_u8(&mut buf, "payload length")? as usize
            } else {
                if buf.remaining() < 4 {
                    return Err(Error::malformed("truncated payload length"));
                }
                buf.get_u32() as usize
            };
            let id_len = if header & FLAG_IL != 0 {
                Some(take_u8(&mut buf, "id length")? as usize)
            } else {
                None
            };

            if tnf == Tnf::Empty && (type_len != 0 || payload_len != 0 || id_len.unwrap_or(0) != 0)
            {
                return Err(Error::malformed("empty record carries data"));
            }

            let record_type = take_bytes(&mut buf, type_len, "record type")?;
            let id = match id_len {
                Some(len) => Some(take_bytes(&mut buf, len, "record id")?),
                None => None,
            };
            let payload = take_bytes(&mut buf, payload_len, "payload")?;

            records.push(NdefRecord {
                tnf,
                record_type,
                id,
                payload,
            });

            if header & FLAG_ME != 0 {
                break;
            }
            if !buf.has_remaining() {
                return Err(Error::malformed("last record is missing the ME flag"));
            }
        }

        if buf.has_remaining() {
            return Err(Error::malformed(format!(
                "{} trailing bytes after last record",
                buf.remaining()
            )));
        }

        Ok(Self { records })
    }
}

impl From<NdefRecord> for NdefMessage {
    fn from(record: NdefRecord) -> Self {
        Self::single(record)
    }
}

fn take_u8(buf: &mut &[u8], what: &str) -> Result<u8> {
    if !buf.has_remaining() {
        return Err(Error::malformed(format!("truncated {what}")));
    }
    Ok(buf.get_u8())
}

fn take_bytes(buf: &mut &[u8], len: usize, what: &str) -> Result<Vec<u8>> {
    if buf.remaining() < len {
        return Err(Error::malformed(format!(
            "truncated {what}: need {len} bytes, {} left",
            buf.remaining()
        )));
    }
    let out = buf[..len].to_vec();
    buf.advance(len);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_deserialize_rejects_empty_records() {
        let result = serde_json::from_str::<NdefMessage>(r#"{"records":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_records() {
        let message = NdefMessage::new(vec![
            NdefRecord::uri("https://example.com"),
            NdefRecord::text("Example", "en"),
        ])
        .unwrap();
        let json = serde_json::to_string(&message).unwrap();
        let parsed: NdefMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, message);
        assert_eq!(parsed.to_bytes().unwrap(), message.to_bytes().unwrap());
    }

    #[test]
    fn test_single_text_record_bytes() {
        let message = NdefMessage::single(NdefRecord::text("Hi", "en"));
        let bytes = message.to_bytes().unwrap();
        assert_eq!(&bytes[..], &[0xD1, 0x01, 0x05, b'T', 0x02, b'e', b'n', b'H', b'i']);
    }

    #[test]
    fn test_empty_message_bytes() {
        let bytes = NdefMessage::empty().to_bytes().unwrap();
        assert_eq!(&bytes[..], &[0xD0, 0x00, 0x00]);
        assert!(NdefMessage::parse(&bytes).unwrap().is_blank());
    }

    #[test]
    fn test_flags_across_records() {
        let message = NdefMessage::new(vec![
            NdefRecord::uri("https://a.b"),
            NdefRecord::text("x", "en").with_id(b"1".to_vec()),
            NdefRecord::android_app("com.example.app"),
        ])
        .unwrap();
        let bytes = message.to_bytes().unwrap();

        // First header: MB + SR + well-known
        assert_eq!(bytes[0], 0x91);
        let parsed = NdefMessage::parse(&bytes).unwrap();
        assert_eq!(parsed, message);
        assert_eq!(parsed.records()[1].id.as_deref(), Some(&b"1"[..]));
    }

    #[test]
    fn test_long_payload_uses_four_byte_length() {
        let text = "a".repeat(300);
        let message = NdefMessage::single(NdefRecord::text(&text, "en"));
        let bytes = message.to_bytes().unwrap();

        assert_eq!(bytes[0] & FLAG_SR, 0);
        assert_eq!(&bytes[2..6], &303u32.to_be_bytes());
        assert_eq!(NdefMessage::parse(&bytes).unwrap(), message);
    }

    #[test]
    fn test_new_rejects_no_records() {
        assert!(matches!(
            NdefMessage::new(vec![]),
            Err(Error::MalformedNdef(_))
        ));
    }

    #[rstest]
    #[case::empty_input(&[])]
    #[case::missing_mb(&[0x51, 0x01, 0x01, b'T', 0x00])]
    #[case::chunked(&[0xB1, 0x01, 0x01, b'T', 0x00])]
    #[case::truncated_payload(&[0xD1, 0x01, 0x05, b'T', 0x02])]
    #[case::missing_me(&[0x91, 0x01, 0x01, b'T', 0x00])]
    #[case::trailing(&[0xD0, 0x00, 0x00, 0xFF])]
    #[case::empty_with_data(&[0xD0, 0x01, 0x00, b'X'])]
    #[case::truncated_long_length(&[0xC1, 0x01, 0x00])]
    fn test_parse_rejects_malformed(#[case] bytes: &[u8]) {
        assert!(matches!(
            NdefMessage::parse(bytes),
            Err(Error::MalformedNdef(_))
        ));
    }

    #[test]
    fn test_parse_rejects_repeated_mb() {
        let mut bytes = NdefMessage::empty().to_bytes().unwrap().to_vec();
        bytes[0] &= !FLAG_ME;
        bytes.extend_from_slice(&[0xD0, 0x00, 0x00]);
        assert!(NdefMessage::parse(&bytes).is_err());
    }
}
