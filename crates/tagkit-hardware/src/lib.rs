//! Platform abstraction for the tagkit NFC toolkit.
//!
//! This crate defines the contract between the toolkit and whatever NFC
//! stack the host provides, plus mock implementations that let the whole
//! toolkit run and be tested without hardware.
//!
//! # Architecture
//!
//! - [`traits`]: `NfcAdapter` (reader mode, tag discovery) and `NfcTag`
//!   (NDEF read/write/format/lock on one tag handle)
//! - [`devices`]: enum dispatch wrappers (`AnyNfcAdapter`, `AnyTag`)
//! - [`device_info`]: device inventory types and the `DeviceInfoProvider`
//!   pass-through
//! - [`mock`]: simulated adapter, tags and device inventory
//!
//! # Examples
//!
//! ```
//! use tagkit_hardware::mock::{MockNfcAdapter, MockTag};
//! use tagkit_hardware::traits::{NfcAdapter, NfcTag};
//!
//! #[tokio::main]
//! async fn main() -> tagkit_hardware::Result<()> {
//!     let (adapter, handle) = MockNfcAdapter::new();
//!     adapter.enable_reader_mode().await?;
//!
//!     handle.present_tag(MockTag::formatable(vec![0x04, 0x01])).await?;
//!     let tag = adapter.next_tag().await?;
//!     tag.format_ndef(&[0xD0, 0x00, 0x00]).await?;
//!
//!     assert_eq!(tag.read_ndef().await?, Some(vec![0xD0, 0x00, 0x00]));
//!     Ok(())
//! }
//! ```

pub mod device_info;
pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use device_info::{
    BatteryInfo, DeviceInfo, DeviceInfoProvider, MemoryInfo, NetworkInfo, StorageInfo,
};
pub use devices::{AnyNfcAdapter, AnyTag};
pub use error::{HardwareError, Result};
pub use traits::{NfcAdapter, NfcTag};
pub use types::{AdapterInfo, NdefCapabilities};
