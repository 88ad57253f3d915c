//! The toolkit's public surface.
//!
//! [`NfcService`] wires a platform adapter, a device-info provider and a
//! [`SessionManager`] together, and runs the discovery pump: one task that
//! reads tags from the adapter and dispatches them to the session in
//! arrival order.

use std::sync::Arc;
use std::time::Duration;

use tagkit_core::{Result, SessionMode, TemplateType, WriteIntent, WriteTemplate};
use tagkit_hardware::{
    BatteryInfo, DeviceInfo, DeviceInfoProvider, HardwareError, MemoryInfo, NetworkInfo,
    NfcAdapter, StorageInfo,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::events::{EventChannel, EventFilter, EventKind, Subscription};
use crate::session::SessionManager;

/// Pause before polling again after a transient adapter error.
const PUMP_RETRY_DELAY: Duration = Duration::from_millis(100);

/// NFC toolkit facade.
///
/// Finish with [`NfcService::shutdown`]. Dropping the service only stops the
/// discovery pump: a read or write session still active at that point keeps
/// reader mode enabled on the adapter.
///
/// # Example
///
/// ```
/// use tagkit_core::{TemplateType, WriteTemplate};
/// use tagkit_hardware::mock::{MockDeviceInfo, MockNfcAdapter, MockTag};
/// use tagkit_session::{NfcEvent, NfcService, SessionConfig};
///
/// #[tokio::main]
/// async fn main() -> tagkit_core::Result<()> {
///     let (adapter, handle) = MockNfcAdapter::new();
///     let service = NfcService::spawn(adapter, MockDeviceInfo::default(), SessionConfig::default());
///     let mut results = service.subscribe_results();
///
///     service
///         .write_template(WriteTemplate::new(TemplateType::Phone).with_field("phone", "+15551234"))
///         .await?;
///     handle.present_tag(MockTag::ndef(vec![0x04, 0x01])).await?;
///
///     let Some(NfcEvent::WriteResult(result)) = results.recv().await else {
///         panic!("expected a write result");
///     };
///     assert!(result.success);
///
///     service.shutdown().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct NfcService<A: NfcAdapter, P: DeviceInfoProvider> {
    session: Arc<SessionManager<A>>,
    events: EventChannel,
    provider: P,
    pump: Option<JoinHandle<()>>,
}

impl<A: NfcAdapter, P: DeviceInfoProvider> NfcService<A, P> {
    /// Build the service and start the discovery pump.
    ///
    /// Must be called from within a tokio runtime. Pair it with
    /// [`NfcService::shutdown`] to leave the adapter idle.
    pub fn spawn(adapter: A, provider: P, config: SessionConfig) -> Self {
        let events = EventChannel::new();
        let session = Arc::new(SessionManager::new(
            Arc::new(adapter),
            events.clone(),
            config,
        ));
        let pump = tokio::spawn(run_pump(Arc::clone(&session)));
        info!("NFC service started");

        Self {
            session,
            events,
            provider,
            pump: Some(pump),
        }
    }

    pub fn session(&self) -> &SessionManager<A> {
        &self.session
    }

    pub async fn mode(&self) -> SessionMode {
        self.session.mode().await
    }

    pub async fn is_nfc_available(&self) -> Result<bool> {
        Ok(self.session.adapter().is_available().await?)
    }

    pub async fn start_session(&self) -> Result<()> {
        self.session.start_read().await
    }

    pub async fn stop_session(&self) -> Result<()> {
        self.session.stop_read().await
    }

    pub async fn start_write_session(&self, intent: WriteIntent) -> Result<()> {
        self.session.start_write(intent).await
    }

    pub async fn stop_write_session(&self) -> Result<()> {
        self.session.stop_write().await
    }

    pub async fn write_template(&self, template: WriteTemplate) -> Result<()> {
        self.session.start_write(template.into()).await
    }

    /// Write free text as a single text record.
    pub async fn write_text(&self, text: impl Into<String>) -> Result<()> {
        self.session.start_write(WriteIntent::Text(text.into())).await
    }

    /// Convenience for a template built from `(field, value)` pairs.
    pub async fn write_fields(
        &self,
        template_type: TemplateType,
        fields: &[(&str, &str)],
    ) -> Result<()> {
        let template = fields
            .iter()
            .fold(WriteTemplate::new(template_type), |template, (key, value)| {
                template.with_field(*key, *value)
            });
        self.write_template(template).await
    }

    pub async fn erase_tag(&self) -> Result<()> {
        self.session.erase().await
    }

    pub async fn format_tag(&self) -> Result<()> {
        self.session.format().await
    }

    /// Arm a permanent lock of the next tag. Irreversible.
    pub async fn make_read_only(&self) -> Result<()> {
        self.session.make_read_only().await
    }

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.events.subscribe(filter)
    }

    pub fn subscribe_tags(&self) -> Subscription {
        self.subscribe(EventFilter::only(EventKind::TagDiscovered))
    }

    pub fn subscribe_progress(&self) -> Subscription {
        self.subscribe(EventFilter::only(EventKind::WriteProgress))
    }

    pub fn subscribe_results(&self) -> Subscription {
        self.subscribe(EventFilter::only(EventKind::WriteResult))
    }

    pub async fn device_info(&self) -> Result<DeviceInfo> {
        Ok(self.provider.device_info().await?)
    }

    pub async fn battery_info(&self) -> Result<BatteryInfo> {
        Ok(self.provider.battery_info().await?)
    }

    pub async fn memory_info(&self) -> Result<MemoryInfo> {
        Ok(self.provider.memory_info().await?)
    }

    pub async fn storage_info(&self) -> Result<StorageInfo> {
        Ok(self.provider.storage_info().await?)
    }

    pub async fn network_info(&self) -> Result<NetworkInfo> {
        Ok(self.provider.network_info().await?)
    }

    pub async fn is_device_rooted(&self) -> Result<bool> {
        Ok(self.provider.is_device_rooted().await?)
    }

    /// Reset the session to `Idle` and stop the discovery pump.
    pub async fn shutdown(mut self) {
        self.session.shutdown().await;

        if let Some(pump) = self.pump.take() {
            pump.abort();
            match pump.await {
                Ok(()) => debug!("Discovery pump already finished"),
                Err(e) if e.is_cancelled() => debug!("Discovery pump cancelled"),
                Err(e) => error!(error = %e, "Discovery pump panicked"),
            }
        }
        info!("NFC service stopped");
    }
}

impl<A: NfcAdapter, P: DeviceInfoProvider> Drop for NfcService<A, P> {
    fn drop(&mut self) {
        let Some(pump) = self.pump.take() else {
            return;
        };
        pump.abort();
        match self.session.try_mode() {
            Some(SessionMode::Idle) => {}
            Some(mode) => warn!(
                mode = %mode,
                "NFC service dropped without shutdown, reader mode left enabled"
            ),
            None => warn!("NFC service dropped without shutdown during a session operation"),
        }
    }
}

/// Read tags from the adapter until it disconnects.
async fn run_pump<A: NfcAdapter>(session: Arc<SessionManager<A>>) {
    debug!("Discovery pump running");
    loop {
        match session.adapter().next_tag().await {
            Ok(tag) => session.handle_discovery(&tag).await,
            Err(HardwareError::Disconnected { device }) => {
                info!(device = %device, "Adapter disconnected, discovery pump exiting");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Tag discovery failed");
                tokio::time::sleep(PUMP_RETRY_DELAY).await;
            }
        }
    }
}
