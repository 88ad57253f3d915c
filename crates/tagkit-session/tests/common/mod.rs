//! Shared fixtures for session integration tests.

#![allow(dead_code)]

use std::time::Duration;

use tagkit_core::{TagSnapshot, WriteProgress, WriteResult};
use tagkit_hardware::mock::{MockAdapterConfig, MockDeviceInfo, MockNfcAdapter, MockNfcHandle};
use tagkit_session::{NfcEvent, NfcService, SessionConfig, Subscription};
use tokio::time::timeout;

pub type MockService = NfcService<MockNfcAdapter, MockDeviceInfo>;

/// How long a test waits for an event before giving up.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a test waits to be sure an event does *not* arrive.
pub const QUIET_PERIOD: Duration = Duration::from_millis(150);

pub fn service() -> (MockService, MockNfcHandle) {
    service_with(MockAdapterConfig::default(), SessionConfig::default())
}

pub fn service_with(
    adapter_config: MockAdapterConfig,
    config: SessionConfig,
) -> (MockService, MockNfcHandle) {
    let (adapter, handle) = MockNfcAdapter::with_config(adapter_config);
    let service = NfcService::spawn(adapter, MockDeviceInfo::default(), config);
    (service, handle)
}

/// Next event, failing the test if none arrives in time.
pub async fn next_event(subscription: &mut Subscription) -> NfcEvent {
    timeout(EVENT_TIMEOUT, subscription.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

/// Assert nothing arrives within the quiet period.
pub async fn assert_quiet(subscription: &mut Subscription) {
    if let Ok(event) = timeout(QUIET_PERIOD, subscription.recv()).await {
        panic!("unexpected event: {event:?}");
    }
}

pub async fn next_snapshot(subscription: &mut Subscription) -> TagSnapshot {
    match next_event(subscription).await {
        NfcEvent::TagDiscovered(snapshot) => snapshot,
        other => panic!("expected TagDiscovered, got {other:?}"),
    }
}

/// Collect the Started / WriteResult / Finished triple of one write.
///
/// # Panics
///
/// Panics if the events do not arrive in that order.
pub async fn next_write(subscription: &mut Subscription) -> WriteResult {
    assert_eq!(
        next_event(subscription).await,
        NfcEvent::WriteProgress(WriteProgress::Started)
    );
    let result = match next_event(subscription).await {
        NfcEvent::WriteResult(result) => result,
        other => panic!("expected WriteResult, got {other:?}"),
    };
    assert_eq!(
        next_event(subscription).await,
        NfcEvent::WriteProgress(WriteProgress::Finished)
    );
    result
}
