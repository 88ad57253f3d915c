//! NDEF codec for tagkit.
//!
//! Two directions:
//!
//! - **Encode**: a [`WriteTemplate`](tagkit_core::WriteTemplate) (or a raw
//!   text message) is validated into a [`Template`] and turned into an
//!   [`NdefMessage`], which serializes to the NDEF binary layout.
//! - **Decode**: records read from a tag become display strings. Decoding
//!   never fails; unknown records become placeholders.
//!
//! # Examples
//!
//! ```
//! use tagkit_core::{TemplateType, WriteTemplate};
//! use tagkit_ndef::{decode_bytes, encode_template};
//!
//! let template = WriteTemplate::new(TemplateType::Url).with_field("url", "https://example.com");
//! let bytes = encode_template(&template).unwrap().to_bytes().unwrap();
//!
//! assert_eq!(decode_bytes(&bytes), vec!["https://example.com"]);
//! ```

pub mod decode;
pub mod message;
pub mod record;
pub mod template;
pub mod text;
pub mod uri;
pub mod vcard;
pub mod wifi;

pub use decode::{DecodedRecord, decode, decode_bytes, decode_record};
pub use message::NdefMessage;
pub use record::{NdefRecord, Tnf};
pub use template::{Template, encode_template, encode_text};
pub use wifi::{WifiCredential, WifiSecurity};
