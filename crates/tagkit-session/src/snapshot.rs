//! Tag snapshot builder.

use tagkit_core::{Error, Result, TagSnapshot, Technology};
use tagkit_hardware::NfcTag;
use tagkit_ndef::decode_bytes;

/// Read a discovered tag into an immutable [`TagSnapshot`].
///
/// Tags without NDEF support, and NDEF tags holding no message, produce a
/// snapshot with no payloads. Undecodable NDEF content never fails the
/// read; it shows up as placeholder payload strings instead.
///
/// # Errors
///
/// Returns `Error::TagRead` when the tag cannot be read, typically because
/// it left the field.
pub async fn build_snapshot<T: NfcTag>(tag: &T) -> Result<TagSnapshot> {
    let technologies = tag.technologies();

    let payloads = if technologies.contains(&Technology::Ndef) {
        match tag.read_ndef().await {
            Ok(Some(bytes)) => decode_bytes(&bytes),
            Ok(None) => Vec::new(),
            Err(e) => return Err(Error::TagRead(e.to_string())),
        }
    } else {
        Vec::new()
    };

    Ok(TagSnapshot::new(tag.id().as_deref(), technologies, payloads))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagkit_hardware::mock::MockTag;
    use tagkit_ndef::{NdefMessage, NdefRecord};

    #[tokio::test]
    async fn test_snapshot_of_ndef_tag() {
        let message = NdefMessage::single(NdefRecord::uri("https://a.b"));
        let tag = MockTag::new(
            Some(vec![0x04, 0xA1, 0xB2]),
            vec![Technology::Ndef, Technology::MifareClassic],
        )
        .with_message(message.to_bytes().unwrap().to_vec());

        let snapshot = build_snapshot(&tag).await.unwrap();
        assert_eq!(snapshot.id.as_deref(), Some("04A1B2"));
        assert_eq!(snapshot.technology_names(), vec!["NDEF", "MIFARE_CLASSIC"]);
        assert_eq!(snapshot.payloads, vec!["https://a.b".to_string()]);
    }

    #[tokio::test]
    async fn test_non_ndef_tag_has_no_payloads() {
        let snapshot = build_snapshot(&MockTag::non_ndef(vec![0x01])).await.unwrap();
        assert!(snapshot.payloads.is_empty());
        assert!(!snapshot.is_ndef());
    }

    #[tokio::test]
    async fn test_empty_ndef_tag() {
        let snapshot = build_snapshot(&MockTag::ndef(vec![0x01])).await.unwrap();
        assert!(snapshot.payloads.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_content_becomes_placeholder() {
        let tag = MockTag::ndef(vec![0x01]).with_message(vec![0xFF, 0x00]);
        let snapshot = build_snapshot(&tag).await.unwrap();
        assert_eq!(snapshot.payloads.len(), 1);
        assert!(snapshot.payloads[0].starts_with("[malformed NDEF message"));
    }

    #[tokio::test]
    async fn test_lost_tag_is_read_error() {
        let tag = MockTag::ndef(vec![0x01]);
        tag.remove();
        assert!(matches!(build_snapshot(&tag).await, Err(Error::TagRead(_))));
    }

    #[tokio::test]
    async fn test_missing_id() {
        let snapshot = build_snapshot(&MockTag::new(None, vec![Technology::NfcV]))
            .await
            .unwrap();
        assert_eq!(snapshot.id, None);
    }
}
