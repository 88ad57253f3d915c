//! Mock NFC tag for testing and development.
//!
//! A `MockTag` simulates a tag's memory and lock state. Clones share that
//! state, so a test can present one clone to the adapter and inspect
//! another afterwards.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tagkit_core::Technology;
use tracing::debug;

use crate::{HardwareError, NdefCapabilities, Result, traits::NfcTag};

/// NDEF capacity of an NTAG215, the default for mock tags.
pub const DEFAULT_TAG_CAPACITY: usize = 492;

#[derive(Debug)]
struct TagState {
    technologies: Vec<Technology>,
    ndef: Option<Vec<u8>>,
    capacity: usize,
    writable: bool,
    can_make_read_only: bool,
    in_field: bool,
    writes: usize,
}

/// Simulated NFC tag.
///
/// # Examples
///
/// ```
/// use tagkit_hardware::mock::MockTag;
/// use tagkit_hardware::traits::NfcTag;
///
/// #[tokio::main]
/// async fn main() -> tagkit_hardware::Result<()> {
///     let tag = MockTag::ndef(vec![0x04, 0xAB, 0xCD, 0xEF]);
///
///     tag.write_ndef(&[0xD0, 0x00, 0x00]).await?;
///     assert_eq!(tag.read_ndef().await?, Some(vec![0xD0, 0x00, 0x00]));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockTag {
    id: Option<Vec<u8>>,
    state: Arc<Mutex<TagState>>,
}

impl MockTag {
    /// Tag with an explicit technology list and an empty NDEF area.
    pub fn new(id: Option<Vec<u8>>, technologies: Vec<Technology>) -> Self {
        Self {
            id,
            state: Arc::new(Mutex::new(TagState {
                technologies,
                ndef: None,
                capacity: DEFAULT_TAG_CAPACITY,
                writable: true,
                can_make_read_only: true,
                in_field: true,
                writes: 0,
            })),
        }
    }

    /// NDEF-formatted NTAG-style tag.
    pub fn ndef(id: Vec<u8>) -> Self {
        Self::new(
            Some(id),
            vec![Technology::NfcA, Technology::MifareUltralight, Technology::Ndef],
        )
    }

    /// Blank MIFARE Classic that can be formatted for NDEF.
    pub fn formatable(id: Vec<u8>) -> Self {
        Self::new(
            Some(id),
            vec![Technology::NfcA, Technology::MifareClassic, Technology::NdefFormatable],
        )
    }

    /// Tag with no NDEF support at all.
    pub fn non_ndef(id: Vec<u8>) -> Self {
        Self::new(Some(id), vec![Technology::NfcA, Technology::IsoDep])
    }

    pub fn with_message(self, message: impl Into<Vec<u8>>) -> Self {
        self.state().ndef = Some(message.into());
        self
    }

    pub fn with_capacity(self, capacity: usize) -> Self {
        self.state().capacity = capacity;
        self
    }

    /// Already locked: writes fail and it cannot be locked again.
    pub fn read_only(self) -> Self {
        {
            let mut state = self.state();
            state.writable = false;
            state.can_make_read_only = false;
        }
        self
    }

    /// Writable, but the chip has no permanent lock.
    pub fn without_lock_support(self) -> Self {
        self.state().can_make_read_only = false;
        self
    }

    /// Simulate the tag leaving the field.
    pub fn remove(&self) {
        self.state().in_field = false;
    }

    /// Current NDEF bytes, for assertions.
    pub fn ndef_bytes(&self) -> Option<Vec<u8>> {
        self.state().ndef.clone()
    }

    pub fn is_writable(&self) -> bool {
        self.state().writable
    }

    /// Number of successful writes and formats.
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    fn state(&self) -> MutexGuard<'_, TagState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state, failing if the tag is gone.
    fn reachable(&self) -> Result<MutexGuard<'_, TagState>> {
        let state = self.state();
        if !state.in_field {
            return Err(HardwareError::TagLost);
        }
        Ok(state)
    }

    fn reachable_ndef(&self, operation: &str) -> Result<MutexGuard<'_, TagState>> {
        let state = self.reachable()?;
        if !state.technologies.contains(&Technology::Ndef) {
            return Err(HardwareError::unsupported(operation));
        }
        Ok(state)
    }
}

impl NfcTag for MockTag {
    fn id(&self) -> Option<Vec<u8>> {
        self.id.clone()
    }

    fn technologies(&self) -> Vec<Technology> {
        self.state().technologies.clone()
    }

    async fn read_ndef(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.reachable_ndef("read_ndef")?.ndef.clone())
    }

    async fn ndef_capabilities(&self) -> Result<NdefCapabilities> {
        let state = self.reachable_ndef("ndef_capabilities")?;
        Ok(NdefCapabilities {
            max_size: state.capacity,
            writable: state.writable,
            can_make_read_only: state.can_make_read_only,
        })
    }

    async fn write_ndef(&self, message: &[u8]) -> Result<()> {
        let mut state = self.reachable_ndef("write_ndef")?;
        if !state.writable {
            return Err(HardwareError::ReadOnly);
        }
        if message.len() > state.capacity {
            return Err(HardwareError::capacity_exceeded(message.len(), state.capacity));
        }
        state.ndef = Some(message.to_vec());
        state.writes += 1;
        debug!(len = message.len(), "Mock tag written");
        Ok(())
    }

    async fn format_ndef(&self, message: &[u8]) -> Result<()> {
        let mut state = self.reachable()?;
        let Some(position) = state
            .technologies
            .iter()
            .position(|t| *t == Technology::NdefFormatable)
        else {
            return Err(HardwareError::unsupported("format_ndef"));
        };
        if message.len() > state.capacity {
            return Err(HardwareError::capacity_exceeded(message.len(), state.capacity));
        }
        state.technologies[position] = Technology::Ndef;
        state.ndef = Some(message.to_vec());
        state.writes += 1;
        debug!(len = message.len(), "Mock tag formatted");
        Ok(())
    }

    async fn make_read_only(&self) -> Result<()> {
        let mut state = self.reachable_ndef("make_read_only")?;
        if !state.can_make_read_only {
            return Err(HardwareError::unsupported("make_read_only"));
        }
        state.writable = false;
        state.can_make_read_only = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UID: [u8; 7] = [0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];

    #[tokio::test]
    async fn test_write_and_read() {
        let tag = MockTag::ndef(UID.to_vec());
        assert_eq!(tag.read_ndef().await.unwrap(), None);

        tag.write_ndef(b"\xD0\x00\x00").await.unwrap();
        assert_eq!(tag.read_ndef().await.unwrap().as_deref(), Some(&b"\xD0\x00\x00"[..]));
        assert_eq!(tag.write_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_memory() {
        let tag = MockTag::ndef(UID.to_vec());
        let presented = tag.clone();
        presented.write_ndef(&[1, 2, 3]).await.unwrap();
        assert_eq!(tag.ndef_bytes(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_read_only_rejects_write() {
        let tag = MockTag::ndef(UID.to_vec()).read_only();
        assert!(matches!(tag.write_ndef(&[1]).await, Err(HardwareError::ReadOnly)));
        let caps = tag.ndef_capabilities().await.unwrap();
        assert!(!caps.writable);
        assert!(!caps.can_make_read_only);
    }

    #[tokio::test]
    async fn test_capacity_enforced() {
        let tag = MockTag::ndef(UID.to_vec()).with_capacity(4);
        assert!(matches!(
            tag.write_ndef(&[0; 5]).await,
            Err(HardwareError::CapacityExceeded {
                required: 5,
                capacity: 4
            })
        ));
        assert_eq!(tag.write_count(), 0);
    }

    #[tokio::test]
    async fn test_removed_tag_is_lost() {
        let tag = MockTag::ndef(UID.to_vec());
        tag.remove();
        assert!(matches!(tag.read_ndef().await, Err(HardwareError::TagLost)));
        assert!(matches!(tag.write_ndef(&[1]).await, Err(HardwareError::TagLost)));
    }

    #[tokio::test]
    async fn test_format_turns_tag_into_ndef() {
        let tag = MockTag::formatable(UID.to_vec());
        assert!(matches!(tag.read_ndef().await, Err(HardwareError::Unsupported { .. })));

        tag.format_ndef(&[0xD0, 0x00, 0x00]).await.unwrap();
        assert!(tag.technologies().contains(&Technology::Ndef));
        assert!(!tag.technologies().contains(&Technology::NdefFormatable));
        assert_eq!(tag.ndef_bytes(), Some(vec![0xD0, 0x00, 0x00]));
    }

    #[tokio::test]
    async fn test_format_requires_formatable() {
        let tag = MockTag::ndef(UID.to_vec());
        assert!(matches!(
            tag.format_ndef(&[0xD0, 0x00, 0x00]).await,
            Err(HardwareError::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_make_read_only() {
        let tag = MockTag::ndef(UID.to_vec());
        tag.make_read_only().await.unwrap();
        assert!(!tag.is_writable());
        assert!(tag.make_read_only().await.is_err());

        let no_lock = MockTag::ndef(UID.to_vec()).without_lock_support();
        assert!(matches!(
            no_lock.make_read_only().await,
            Err(HardwareError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_absent_id() {
        let tag = MockTag::new(None, vec![Technology::NfcV]);
        assert_eq!(tag.id(), None);
        assert_eq!(tag.technologies(), vec![Technology::NfcV]);
    }
}
