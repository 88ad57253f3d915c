//! URI record payloads.
//!
//! The first payload byte is an identifier code standing for a common URI
//! prefix; the rest is the UTF-8 remainder of the URI. Codes beyond the
//! table are reserved and decode as "no prefix".

use std::fmt::Write as _;

/// URI identifier codes, indexed by code.
pub const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Encode a URI into a record payload, abbreviating the longest known prefix.
///
/// # Examples
///
/// ```
/// use tagkit_ndef::uri::encode_payload;
///
/// assert_eq!(encode_payload("tel:+1234567890"), b"\x05+1234567890");
/// assert_eq!(encode_payload("geo:1,2"), b"\x00geo:1,2");
/// ```
pub fn encode_payload(uri: &str) -> Vec<u8> {
    let (code, prefix) = URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, prefix)| uri.starts_with(*prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(code, prefix)| (code as u8, *prefix))
        .unwrap_or((0, ""));

    let rest = &uri[prefix.len()..];
    let mut payload = Vec::with_capacity(1 + rest.len());
    payload.push(code);
    payload.extend_from_slice(rest.as_bytes());
    payload
}

/// Expand a record payload back into the full URI.
pub fn decode_payload(payload: &[u8]) -> String {
    let Some((&code, rest)) = payload.split_first() else {
        return String::new();
    };
    let prefix = URI_PREFIXES.get(code as usize).copied().unwrap_or("");
    format!("{prefix}{}", String::from_utf8_lossy(rest))
}

/// Percent-encode a URI component (RFC 3986 unreserved characters kept).
pub fn percent_encode(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for byte in component.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com", 0x04)]
    #[case("http://www.example.com", 0x01)]
    #[case("https://www.example.com/path", 0x02)]
    #[case("mailto:contact@example.com", 0x06)]
    #[case("urn:epc:id:sgtin:1", 0x1E)]
    #[case("urn:isbn:123", 0x13)]
    #[case("sms:+1234567890", 0x00)]
    fn test_prefix_selection(#[case] uri: &str, #[case] code: u8) {
        let payload = encode_payload(uri);
        assert_eq!(payload[0], code);
        assert_eq!(decode_payload(&payload), uri);
    }

    #[test]
    fn test_reserved_code_decodes_without_prefix() {
        assert_eq!(decode_payload(b"\x7Fexample"), "example");
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(decode_payload(&[]), "");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("Hello from NFC!"), "Hello%20from%20NFC%21");
        assert_eq!(percent_encode("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }
}
