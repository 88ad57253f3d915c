//! Platform abstraction traits.
//!
//! The toolkit never talks to an NFC radio directly. A platform stack
//! (Android's `NfcAdapter`, a PC/SC reader, a mock) detects tags and hands
//! over opaque tag handles; these traits are the contract between that
//! stack and the session layer.
//!
//! Methods return `impl Future + Send` (Rust 1.90 + Edition 2024 RPITIT)
//! so generic session code can drive adapters from spawned tasks without
//! the `async_trait` macro. Implementations are free to write `async fn`.

use std::future::Future;

use tagkit_core::Technology;

use crate::error::Result;
use crate::types::{AdapterInfo, NdefCapabilities};

/// A tag handle presented by the platform at discovery time.
///
/// A handle stays valid while the tag is in the field; once the tag is
/// removed every I/O method fails with
/// [`HardwareError::TagLost`](crate::HardwareError::TagLost).
pub trait NfcTag: Send + Sync {
    /// Tag identifier (UID), if the platform exposes one.
    fn id(&self) -> Option<Vec<u8>>;

    /// Technologies in the order the platform reports them.
    fn technologies(&self) -> Vec<Technology>;

    /// Read the raw NDEF message.
    ///
    /// `Ok(None)` means the tag is NDEF-formatted but holds no message.
    ///
    /// # Errors
    ///
    /// Returns `TagLost` if the tag left the field and `Unsupported` if the
    /// tag has no NDEF technology.
    fn read_ndef(&self) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Capacity and lock state of the NDEF area.
    fn ndef_capabilities(&self) -> impl Future<Output = Result<NdefCapabilities>> + Send;

    /// Overwrite the NDEF message.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly`, `CapacityExceeded`, `TagLost` or a
    /// communication error.
    fn write_ndef(&self, message: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Format an `NDEF_FORMATABLE` tag, writing `message` as its first
    /// NDEF message.
    fn format_ndef(&self, message: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Permanently lock the tag. Irreversible.
    fn make_read_only(&self) -> impl Future<Output = Result<()>> + Send;
}

/// The platform NFC adapter.
///
/// Reader mode must be enabled for tags to be delivered; while it is
/// disabled the platform drops tags that enter the field.
pub trait NfcAdapter: Send + Sync + 'static {
    type Tag: NfcTag + 'static;

    /// Whether the device has NFC hardware and it is switched on.
    fn is_available(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Start delivering discovered tags. Resolves once the platform
    /// acknowledges.
    fn enable_reader_mode(&self) -> impl Future<Output = Result<()>> + Send;

    /// Stop delivering discovered tags. Resolves once the platform
    /// acknowledges.
    fn disable_reader_mode(&self) -> impl Future<Output = Result<()>> + Send;

    /// Wait for the next discovered tag.
    ///
    /// # Errors
    ///
    /// Returns `Disconnected` once the platform stops producing tags for
    /// good; callers should stop polling.
    fn next_tag(&self) -> impl Future<Output = Result<Self::Tag>> + Send;

    /// Adapter metadata.
    fn adapter_info(&self) -> impl Future<Output = Result<AdapterInfo>> + Send;
}
