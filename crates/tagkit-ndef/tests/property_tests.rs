//! Property-based tests for the NDEF codec.
//!
//! These use proptest to check that encoding and decoding hold up for
//! arbitrary user input and arbitrary bytes read off a tag.

mod common;

use proptest::prelude::*;
use tagkit_core::{Error, TemplateType};
use tagkit_ndef::{NdefMessage, NdefRecord, Tnf, decode, decode_bytes, encode_template, encode_text};

/// Non-blank free text, including multi-byte characters.
fn valid_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 àéîõüß✓€]{0,300}[a-zA-Z0-9]")
        .expect("Failed to create text regex strategy")
}

/// URIs with a mix of abbreviated and unabbreviated schemes.
fn valid_uri() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("https://"),
            Just("http://www."),
            Just("tel:"),
            Just("urn:epc:id:"),
            Just("geo:"),
            Just(""),
        ],
        "[a-z0-9./?=&-]{1,80}",
    )
        .prop_map(|(scheme, rest)| format!("{scheme}{rest}"))
}

fn any_tnf() -> impl Strategy<Value = Tnf> {
    prop_oneof![
        Just(Tnf::WellKnown),
        Just(Tnf::Media),
        Just(Tnf::AbsoluteUri),
        Just(Tnf::External),
        Just(Tnf::Unknown),
        Just(Tnf::Reserved),
    ]
}

fn any_record() -> impl Strategy<Value = NdefRecord> {
    (
        any_tnf(),
        prop::collection::vec(any::<u8>(), 0..16),
        prop::option::of(prop::collection::vec(any::<u8>(), 0..8)),
        prop::collection::vec(any::<u8>(), 0..400),
    )
        .prop_map(|(tnf, record_type, id, payload)| NdefRecord {
            tnf,
            record_type,
            id,
            payload,
        })
}

proptest! {
    /// Property: TEXT templates decode back to the exact text.
    #[test]
    fn prop_text_template_roundtrip(text in valid_text()) {
        let payloads = common::encode_and_decode(&common::template(TemplateType::Text, &[("text", text.as_str())]));
        prop_assert_eq!(payloads, vec![text.clone()]);
    }

    /// Property: URL templates decode back to the identical URI string.
    #[test]
    fn prop_url_template_roundtrip(uri in valid_uri()) {
        let payloads = common::encode_and_decode(&common::template(TemplateType::Url, &[("url", uri.as_str())]));
        prop_assert_eq!(payloads, vec![uri.clone()]);
    }

    /// Property: the custom-message path writes the same bytes as the TEXT template.
    #[test]
    fn prop_custom_text_matches_template(text in valid_text()) {
        let custom = encode_text(&text).unwrap();
        let templated = encode_template(&common::template(TemplateType::Text, &[("text", text.as_str())])).unwrap();
        prop_assert_eq!(common::serialize(&custom), common::serialize(&templated));
    }

    /// Property: any security outside the supported set is rejected.
    #[test]
    fn prop_unknown_wifi_security_rejected(security in "[A-Za-z0-9-]{1,12}") {
        let upper = security.to_ascii_uppercase();
        prop_assume!(!["WPA", "WPA2", "WEP", "NONE"].contains(&upper.as_str()));

        let result = encode_template(&common::wifi_template("net", "pw", &security));
        let is_invalid_field_value = matches!(result, Err(Error::InvalidFieldValue { .. }));
        prop_assert!(is_invalid_field_value);
    }

    /// Property: well-formed messages survive the binary layout unchanged.
    #[test]
    fn prop_message_binary_roundtrip(records in prop::collection::vec(any_record(), 1..5)) {
        let message = NdefMessage::new(records).unwrap();
        let parsed = NdefMessage::parse(&common::serialize(&message)).unwrap();
        prop_assert_eq!(parsed, message);
    }

    /// Property: decoding yields one string per record and never panics.
    #[test]
    fn prop_decode_one_string_per_record(records in prop::collection::vec(any_record(), 0..5)) {
        prop_assert_eq!(decode(&records).len(), records.len());
    }

    /// Property: arbitrary bytes from a tag never make decoding fail.
    #[test]
    fn prop_decode_bytes_total(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let payloads = decode_bytes(&bytes);
        if NdefMessage::parse(&bytes).is_err() && !bytes.is_empty() {
            prop_assert_eq!(payloads, vec![format!("[malformed NDEF message: {} bytes]", bytes.len())]);
        }
    }
}
