//! Mock platform implementations for testing and development.
//!
//! These simulate an NFC adapter, tags and the device inventory so the
//! whole toolkit can run without a phone or a reader attached.

pub mod adapter;
pub mod device_info;
pub mod tag;

pub use adapter::{MockAdapterConfig, MockNfcAdapter, MockNfcHandle};
pub use device_info::MockDeviceInfo;
pub use tag::{DEFAULT_TAG_CAPACITY, MockTag};
