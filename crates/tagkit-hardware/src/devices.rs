//! Enum wrappers for platform dispatch.
//!
//! `NfcAdapter` and `NfcTag` return `impl Future`, so they are not object
//! safe and `Box<dyn NfcAdapter>` is not an option. These enums give the
//! session layer one concrete type to hold while leaving room for more
//! backends.
//!
//! # Examples
//!
//! ```
//! use tagkit_hardware::devices::AnyNfcAdapter;
//! use tagkit_hardware::mock::MockNfcAdapter;
//! use tagkit_hardware::traits::NfcAdapter;
//!
//! #[tokio::main]
//! async fn main() -> tagkit_hardware::Result<()> {
//!     let (adapter, _handle) = MockNfcAdapter::new();
//!     let adapter = AnyNfcAdapter::Mock(adapter);
//!
//!     let info = adapter.adapter_info().await?;
//!     assert_eq!(info.name, "Mock NFC Adapter");
//!     Ok(())
//! }
//! ```

use tagkit_core::Technology;

use crate::mock::{MockNfcAdapter, MockTag};
use crate::traits::{NfcAdapter, NfcTag};
use crate::{AdapterInfo, NdefCapabilities, Result};

/// Enum wrapper for adapter dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyNfcAdapter {
    /// Mock adapter for development and testing.
    Mock(MockNfcAdapter),
}

/// Tag handle produced by an [`AnyNfcAdapter`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyTag {
    Mock(MockTag),
}

impl NfcAdapter for AnyNfcAdapter {
    type Tag = AnyTag;

    async fn is_available(&self) -> Result<bool> {
        match self {
            Self::Mock(adapter) => adapter.is_available().await,
        }
    }

    async fn enable_reader_mode(&self) -> Result<()> {
        match self {
            Self::Mock(adapter) => adapter.enable_reader_mode().await,
        }
    }

    async fn disable_reader_mode(&self) -> Result<()> {
        match self {
            Self::Mock(adapter) => adapter.disable_reader_mode().await,
        }
    }

    async fn next_tag(&self) -> Result<AnyTag> {
        match self {
            Self::Mock(adapter) => adapter.next_tag().await.map(AnyTag::Mock),
        }
    }

    async fn adapter_info(&self) -> Result<AdapterInfo> {
        match self {
            Self::Mock(adapter) => adapter.adapter_info().await,
        }
    }
}

impl NfcTag for AnyTag {
    fn id(&self) -> Option<Vec<u8>> {
        match self {
            Self::Mock(tag) => tag.id(),
        }
    }

    fn technologies(&self) -> Vec<Technology> {
        match self {
            Self::Mock(tag) => tag.technologies(),
        }
    }

    async fn read_ndef(&self) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Mock(tag) => tag.read_ndef().await,
        }
    }

    async fn ndef_capabilities(&self) -> Result<NdefCapabilities> {
        match self {
            Self::Mock(tag) => tag.ndef_capabilities().await,
        }
    }

    async fn write_ndef(&self, message: &[u8]) -> Result<()> {
        match self {
            Self::Mock(tag) => tag.write_ndef(message).await,
        }
    }

    async fn format_ndef(&self, message: &[u8]) -> Result<()> {
        match self {
            Self::Mock(tag) => tag.format_ndef(message).await,
        }
    }

    async fn make_read_only(&self) -> Result<()> {
        match self {
            Self::Mock(tag) => tag.make_read_only().await,
        }
    }
}

impl From<MockNfcAdapter> for AnyNfcAdapter {
    fn from(adapter: MockNfcAdapter) -> Self {
        Self::Mock(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_adapter_delivers_any_tag() {
        let (adapter, handle) = MockNfcAdapter::new();
        let adapter = AnyNfcAdapter::from(adapter);

        adapter.enable_reader_mode().await.unwrap();
        handle
            .present_tag(MockTag::ndef(vec![0xAA, 0xBB]))
            .await
            .unwrap();

        let tag = adapter.next_tag().await.unwrap();
        assert_eq!(tag.id(), Some(vec![0xAA, 0xBB]));
        assert!(tag.technologies().contains(&Technology::Ndef));
    }

    #[tokio::test]
    async fn test_any_tag_forwards_writes() {
        let inner = MockTag::ndef(vec![0x01]);
        let tag = AnyTag::Mock(inner.clone());

        tag.write_ndef(&[0xD0, 0x00, 0x00]).await.unwrap();
        assert_eq!(inner.ndef_bytes(), Some(vec![0xD0, 0x00, 0x00]));
    }
}
