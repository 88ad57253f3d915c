//! Mock NFC adapter implementation for testing and development.
//!
//! This module provides a simulated platform adapter that can be controlled
//! programmatically: tags are "tapped" through a [`MockNfcHandle`] and are
//! delivered only while reader mode is enabled, as a real platform would.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tagkit_core::constants::DEFAULT_DISCOVERY_BUFFER;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::{AdapterInfo, HardwareError, Result, mock::MockTag, traits::NfcAdapter};

/// Configuration for a mock adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockAdapterConfig {
    /// Adapter name reported by `adapter_info`.
    pub name: String,

    /// Whether NFC is reported as available.
    pub available: bool,

    /// Delay before reader-mode changes are acknowledged.
    pub ack_delay: Duration,

    /// Capacity of the discovery channel.
    pub discovery_buffer: usize,
}

impl Default for MockAdapterConfig {
    fn default() -> Self {
        Self {
            name: "Mock NFC Adapter".to_string(),
            available: true,
            ack_delay: Duration::ZERO,
            discovery_buffer: DEFAULT_DISCOVERY_BUFFER,
        }
    }
}

#[derive(Debug, Default)]
struct AdapterState {
    reader_mode: AtomicBool,
    fail_next_ack: AtomicBool,
    enable_calls: AtomicUsize,
    disable_calls: AtomicUsize,
}

/// Mock NFC adapter.
///
/// # Examples
///
/// ```
/// use tagkit_hardware::mock::{MockNfcAdapter, MockTag};
/// use tagkit_hardware::traits::{NfcAdapter, NfcTag};
///
/// #[tokio::main]
/// async fn main() -> tagkit_hardware::Result<()> {
///     let (adapter, handle) = MockNfcAdapter::new();
///
///     adapter.enable_reader_mode().await?;
///     handle.present_tag(MockTag::ndef(vec![0x04, 0xAB, 0xCD, 0xEF])).await?;
///
///     let tag = adapter.next_tag().await?;
///     assert_eq!(tag.id(), Some(vec![0x04, 0xAB, 0xCD, 0xEF]));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockNfcAdapter {
    tag_rx: Mutex<mpsc::Receiver<MockTag>>,
    state: Arc<AdapterState>,
    config: MockAdapterConfig,
}

impl MockNfcAdapter {
    /// Create a mock adapter with the default configuration.
    ///
    /// Returns the adapter and a handle used to present tags to it.
    pub fn new() -> (Self, MockNfcHandle) {
        Self::with_config(MockAdapterConfig::default())
    }

    pub fn with_config(config: MockAdapterConfig) -> (Self, MockNfcHandle) {
        let (tag_tx, tag_rx) = mpsc::channel(config.discovery_buffer.max(1));
        let state = Arc::new(AdapterState::default());

        let adapter = Self {
            tag_rx: Mutex::new(tag_rx),
            state: Arc::clone(&state),
            config,
        };
        let handle = MockNfcHandle { tag_tx, state };

        (adapter, handle)
    }

    async fn acknowledge(&self, enabled: bool) -> Result<()> {
        if !self.config.ack_delay.is_zero() {
            tokio::time::sleep(self.config.ack_delay).await;
        }
        if self.state.fail_next_ack.swap(false, Ordering::SeqCst) {
            return Err(HardwareError::communication("platform rejected reader mode change"));
        }
        self.state.reader_mode.store(enabled, Ordering::SeqCst);
        debug!(enabled, "Mock reader mode changed");
        Ok(())
    }
}

impl NfcAdapter for MockNfcAdapter {
    type Tag = MockTag;

    async fn is_available(&self) -> Result<bool> {
        Ok(self.config.available)
    }

    async fn enable_reader_mode(&self) -> Result<()> {
        self.state.enable_calls.fetch_add(1, Ordering::SeqCst);
        if !self.config.available {
            return Err(HardwareError::other("NFC is disabled"));
        }
        self.acknowledge(true).await
    }

    async fn disable_reader_mode(&self) -> Result<()> {
        self.state.disable_calls.fetch_add(1, Ordering::SeqCst);
        self.acknowledge(false).await
    }

    async fn next_tag(&self) -> Result<MockTag> {
        let mut tag_rx = self.tag_rx.lock().await;
        loop {
            let tag = tag_rx
                .recv()
                .await
                .ok_or_else(|| HardwareError::disconnected(self.config.name.clone()))?;

            if self.state.reader_mode.load(Ordering::SeqCst) {
                return Ok(tag);
            }
            debug!("Reader mode disabled, dropping tag");
        }
    }

    async fn adapter_info(&self) -> Result<AdapterInfo> {
        Ok(AdapterInfo::new(
            self.config.name.clone(),
            vec![
                "NFC_A".to_string(),
                "NFC_B".to_string(),
                "NFC_F".to_string(),
                "NFC_V".to_string(),
            ],
        ))
    }
}

/// Handle for controlling a mock adapter.
///
/// Cloneable; the adapter reports `Disconnected` from `next_tag` once every
/// handle has been dropped.
#[derive(Debug, Clone)]
pub struct MockNfcHandle {
    tag_tx: mpsc::Sender<MockTag>,
    state: Arc<AdapterState>,
}

impl MockNfcHandle {
    /// Bring a tag into the field.
    ///
    /// # Errors
    ///
    /// Returns `Disconnected` if the adapter has been dropped.
    pub async fn present_tag(&self, tag: MockTag) -> Result<()> {
        self.tag_tx
            .send(tag)
            .await
            .map_err(|_| HardwareError::disconnected("mock adapter dropped"))
    }

    pub fn reader_mode_enabled(&self) -> bool {
        self.state.reader_mode.load(Ordering::SeqCst)
    }

    /// Make the next reader-mode change fail.
    pub fn fail_next_ack(&self) {
        self.state.fail_next_ack.store(true, Ordering::SeqCst);
    }

    /// Number of `enable_reader_mode` calls so far.
    pub fn enable_calls(&self) -> usize {
        self.state.enable_calls.load(Ordering::SeqCst)
    }

    /// Number of `disable_reader_mode` calls so far.
    pub fn disable_calls(&self) -> usize {
        self.state.disable_calls.load(Ordering::SeqCst)
    }
}
