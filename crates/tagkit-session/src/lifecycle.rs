//! Destructive tag operations: erase, format and permanent lock.
//!
//! Each operation runs against one tag inside a single-shot write session
//! and returns the human-readable success message for its `WriteResult`.

use tagkit_core::{Error, Result, TagOperation, Technology};
use tagkit_hardware::NfcTag;
use tagkit_ndef::NdefMessage;
use tracing::debug;

/// Run `operation` against `tag`.
pub async fn run<T: NfcTag>(operation: TagOperation, tag: &T) -> Result<String> {
    debug!(%operation, "Running tag operation");
    match operation {
        TagOperation::Erase => erase(tag).await,
        TagOperation::Format => format(tag).await,
        TagOperation::MakeReadOnly => make_read_only(tag).await,
    }
}

/// Overwrite the tag's NDEF content with the blank message.
///
/// # Errors
///
/// `NotNdef` for tags without NDEF support, `ReadOnly` for locked tags.
pub async fn erase<T: NfcTag>(tag: &T) -> Result<String> {
    if !has(tag, Technology::Ndef) {
        return Err(Error::NotNdef);
    }
    let capabilities = tag.ndef_capabilities().await?;
    if !capabilities.writable {
        return Err(Error::ReadOnly);
    }

    tag.write_ndef(&blank_message()?).await?;
    Ok("Tag erased successfully".to_string())
}

/// Initialize the tag for NDEF with the blank message.
///
/// Formatable tags go through the platform formatter; tags that already
/// speak NDEF are re-initialized in place.
///
/// # Errors
///
/// `UnsupportedOperation` when the tag is neither formatable nor a
/// writable NDEF tag.
pub async fn format<T: NfcTag>(tag: &T) -> Result<String> {
    let blank = blank_message()?;

    if has(tag, Technology::NdefFormatable) {
        tag.format_ndef(&blank).await?;
    } else if has(tag, Technology::Ndef) && tag.ndef_capabilities().await?.writable {
        tag.write_ndef(&blank).await?;
    } else {
        return Err(Error::UnsupportedOperation(
            "tag cannot be formatted for NDEF".to_string(),
        ));
    }

    Ok("Tag formatted successfully".to_string())
}

/// Permanently lock the tag. Irreversible.
///
/// # Errors
///
/// `NotNdef` for tags without NDEF support, `AlreadyReadOnly` when the tag
/// is already locked and `UnsupportedOperation` when the chip has no lock.
pub async fn make_read_only<T: NfcTag>(tag: &T) -> Result<String> {
    if !has(tag, Technology::Ndef) {
        return Err(Error::NotNdef);
    }
    let capabilities = tag.ndef_capabilities().await?;
    if !capabilities.writable {
        return Err(Error::AlreadyReadOnly);
    }
    if !capabilities.can_make_read_only {
        return Err(Error::UnsupportedOperation(
            "tag cannot be made read-only".to_string(),
        ));
    }

    tag.make_read_only().await?;
    Ok("Tag is now read-only".to_string())
}

fn has<T: NfcTag>(tag: &T, technology: Technology) -> bool {
    tag.technologies().contains(&technology)
}

fn blank_message() -> Result<Vec<u8>> {
    Ok(NdefMessage::empty().to_bytes()?.to_vec())
}
