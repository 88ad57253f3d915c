//! tagkit demo driver.
//!
//! Runs the toolkit against the mock adapter: a template write onto a blank
//! tag, a read session, the lifecycle operations and the device queries.
//! Every event and query answer is printed to stdout as one JSON line.
//!
//! ```text
//! RUST_LOG=debug cargo run -p tagkit-cli
//! ```

mod logging;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tagkit_core::{TemplateType, WriteProgress, WriteResult, WriteTemplate};
use tagkit_hardware::AnyNfcAdapter;
use tagkit_hardware::mock::{MockDeviceInfo, MockNfcAdapter, MockNfcHandle, MockTag};
use tagkit_session::{EventFilter, NfcEvent, NfcService, SessionConfig, Subscription};
use tracing::info;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

type DemoService = NfcService<AnyNfcAdapter, MockDeviceInfo>;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");

    let (adapter, handle) = MockNfcAdapter::new();
    let service: DemoService = NfcService::spawn(
        AnyNfcAdapter::from(adapter),
        MockDeviceInfo::default(),
        SessionConfig::default(),
    );
    let mut events = service.subscribe(EventFilter::all());

    let outcome = run(&service, &handle, &mut events).await;
    service.shutdown().await;
    outcome
}

async fn run(
    service: &DemoService,
    handle: &MockNfcHandle,
    events: &mut Subscription,
) -> Result<()> {
    print_json("nfcAvailable", &service.is_nfc_available().await?)?;
    print_json("deviceInfo", &service.device_info().await?)?;
    print_json("batteryInfo", &service.battery_info().await?)?;
    print_json("memoryInfo", &service.memory_info().await?)?;
    print_json("storageInfo", &service.storage_info().await?)?;
    print_json("networkInfo", &service.network_info().await?)?;
    print_json("deviceRooted", &service.is_device_rooted().await?)?;

    let tag = MockTag::formatable(vec![0x04, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6]);

    info!("Writing a URL template onto a blank tag");
    service
        .write_template(
            WriteTemplate::new(TemplateType::Url)
                .with_name("Website URL")
                .with_field("url", "https://example.com"),
        )
        .await?;
    tap(handle, &tag, events).await?;

    info!("Reading the tag back");
    service.start_session().await?;
    handle.present_tag(tag.clone()).await?;
    next_event(events).await?;
    service.stop_session().await?;

    info!("Erasing");
    service.erase_tag().await?;
    tap(handle, &tag, events).await?;

    info!("Formatting");
    service.format_tag().await?;
    tap(handle, &tag, events).await?;

    info!("Writing custom text");
    service.write_text("Hello from tagkit").await?;
    tap(handle, &tag, events).await?;

    info!("Locking the tag");
    service.make_read_only().await?;
    tap(handle, &tag, events).await?;

    info!("Locking it again");
    service.make_read_only().await?;
    let result = tap(handle, &tag, events).await?;
    if result.success {
        bail!("locking a read-only tag unexpectedly succeeded");
    }

    Ok(())
}

/// Present `tag` to an armed write session and print the events it causes.
async fn tap(
    handle: &MockNfcHandle,
    tag: &MockTag,
    events: &mut Subscription,
) -> Result<WriteResult> {
    handle.present_tag(tag.clone()).await?;

    let mut result = None;
    loop {
        match next_event(events).await? {
            NfcEvent::WriteResult(r) => result = Some(r),
            NfcEvent::WriteProgress(WriteProgress::Finished) => break,
            _ => {}
        }
    }
    result.context("write finished without a result")
}

/// Wait for the next event and print it.
async fn next_event(events: &mut Subscription) -> Result<NfcEvent> {
    let event = tokio::time::timeout(EVENT_TIMEOUT, events.recv())
        .await
        .context("timed out waiting for an NFC event")?
        .context("event channel closed")?;
    println!("{}", serde_json::to_string(&event)?);
    Ok(event)
}

#[derive(Serialize)]
struct QueryAnswer<'a, T: Serialize> {
    query: &'a str,
    answer: &'a T,
}

fn print_json<T: Serialize>(query: &str, answer: &T) -> Result<()> {
    println!("{}", serde_json::to_string(&QueryAnswer { query, answer })?);
    Ok(())
}
