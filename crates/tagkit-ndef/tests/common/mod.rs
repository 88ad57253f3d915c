//! Shared helpers for codec integration tests.
//!
//! Helpers come in two kinds:
//!
//! 1. **Builders** (`template`, `*_template`) produce write templates with
//!    the fields the client application sends.
//! 2. **Round trips** (`encode_and_decode`) push a template through the
//!    binary layout and back into display strings, the same path a write
//!    followed by a read takes on a real tag.

#![allow(dead_code)]

use tagkit_core::{TemplateType, WriteTemplate};
use tagkit_ndef::{NdefMessage, decode_bytes, encode_template};

/// Build a template from `(field, value)` pairs.
pub fn template(kind: TemplateType, fields: &[(&str, &str)]) -> WriteTemplate {
    fields
        .iter()
        .fold(WriteTemplate::new(kind), |t, (key, value)| t.with_field(*key, *value))
}

pub fn wifi_template(ssid: &str, password: &str, security: &str) -> WriteTemplate {
    template(
        TemplateType::Wifi,
        &[("ssid", ssid), ("password", password), ("security", security)],
    )
}

pub fn contact_template(name: &str, phone: &str, email: &str) -> WriteTemplate {
    template(
        TemplateType::Contact,
        &[("name", name), ("phone", phone), ("email", email)],
    )
}

/// Encode, serialize, parse and decode a template.
///
/// # Panics
///
/// Panics if the template does not encode.
pub fn encode_and_decode(template: &WriteTemplate) -> Vec<String> {
    let message = encode_template(template).expect("template should encode");
    decode_bytes(&serialize(&message))
}

pub fn serialize(message: &NdefMessage) -> Vec<u8> {
    message.to_bytes().expect("message should serialize").to_vec()
}
