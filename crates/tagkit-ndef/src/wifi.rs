//! Wi-Fi Simple Configuration credential payloads
//! (`application/vnd.wfa.wsc`).
//!
//! The payload is a list of big-endian TLVs (2-byte type, 2-byte length).
//! A Credential TLV nests the network index, SSID, authentication type,
//! encryption type, network key and MAC address attributes.

use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use tagkit_core::{
    Error, Result,
    constants::{FIELD_PASSWORD, FIELD_SECURITY, FIELD_SSID},
};

const ATTR_VERSION: u16 = 0x104A;
const ATTR_CREDENTIAL: u16 = 0x100E;
const ATTR_NETWORK_INDEX: u16 = 0x1026;
const ATTR_SSID: u16 = 0x1045;
const ATTR_AUTH_TYPE: u16 = 0x1003;
const ATTR_ENCRYPTION_TYPE: u16 = 0x100F;
const ATTR_NETWORK_KEY: u16 = 0x1027;
const ATTR_MAC_ADDRESS: u16 = 0x1020;

const WSC_VERSION: u8 = 0x10;

const AUTH_OPEN: u16 = 0x0001;
const AUTH_WPA_PSK: u16 = 0x0002;
const AUTH_WPA: u16 = 0x0008;
const AUTH_WPA2: u16 = 0x0010;
const AUTH_WPA2_PSK: u16 = 0x0020;

const ENCRYPTION_NONE: u16 = 0x0001;
const ENCRYPTION_WEP: u16 = 0x0002;
const ENCRYPTION_TKIP: u16 = 0x0004;
const ENCRYPTION_AES: u16 = 0x0008;

/// Longest SSID a WSC credential may carry, in bytes.
pub const MAX_SSID_LEN: usize = 32;

/// Longest network key a WSC credential may carry, in bytes.
pub const MAX_NETWORK_KEY_LEN: usize = 64;

/// Broadcast MAC: the credential applies to any access point with the SSID.
const ANY_MAC_ADDRESS: [u8; 6] = [0xFF; 6];

/// Network security accepted by the WIFI template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WifiSecurity {
    Wpa,
    Wpa2,
    Wep,
    None,
}

impl WifiSecurity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Wep => "WEP",
            Self::None => "NONE",
        }
    }

    fn auth_type(self) -> u16 {
        match self {
            Self::Wpa => AUTH_WPA_PSK,
            Self::Wpa2 => AUTH_WPA2_PSK,
            Self::Wep | Self::None => AUTH_OPEN,
        }
    }

    fn encryption_type(self) -> u16 {
        match self {
            Self::Wpa => ENCRYPTION_TKIP,
            Self::Wpa2 => ENCRYPTION_AES,
            Self::Wep => ENCRYPTION_WEP,
            Self::None => ENCRYPTION_NONE,
        }
    }

    fn from_wire(auth_type: u16, encryption_type: u16) -> Self {
        if auth_type & (AUTH_WPA2 | AUTH_WPA2_PSK) != 0 {
            Self::Wpa2
        } else if auth_type & (AUTH_WPA | AUTH_WPA_PSK) != 0 {
            Self::Wpa
        } else if encryption_type == ENCRYPTION_WEP {
            Self::Wep
        } else {
            Self::None
        }
    }
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WifiSecurity {
    type Err = Error;

    /// Case-insensitive; anything outside WPA, WPA2, WEP and NONE is rejected.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WPA" => Ok(Self::Wpa),
            "WPA2" => Ok(Self::Wpa2),
            "WEP" => Ok(Self::Wep),
            "NONE" => Ok(Self::None),
            _ => Err(Error::invalid_field_value(
                FIELD_SECURITY,
                s,
                "expected one of WPA, WPA2, WEP, NONE",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredential {
    pub ssid: String,
    pub password: String,
    pub security: WifiSecurity,
}

impl WifiCredential {
    /// Build a credential, checking the SSID and key against the WSC limits.
    ///
    /// # Errors
    ///
    /// `Error::InvalidFieldValue` when the SSID is longer than
    /// [`MAX_SSID_LEN`] bytes or the password longer than
    /// [`MAX_NETWORK_KEY_LEN`] bytes.
    pub fn new(
        ssid: impl Into<String>,
        password: impl Into<String>,
        security: WifiSecurity,
    ) -> Result<Self> {
        let credential = Self {
            ssid: ssid.into(),
            password: password.into(),
            security,
        };
        credential.validate()?;
        Ok(credential)
    }

    fn validate(&self) -> Result<()> {
        if self.ssid.len() > MAX_SSID_LEN {
            return Err(Error::invalid_field_value(
                FIELD_SSID,
                &self.ssid,
                format!("longer than {MAX_SSID_LEN} bytes"),
            ));
        }
        if self.password.len() > MAX_NETWORK_KEY_LEN {
            return Err(Error::invalid_field_value(
                FIELD_PASSWORD,
                format!("<{} bytes>", self.password.len()),
                format!("longer than {MAX_NETWORK_KEY_LEN} bytes"),
            ));
        }
        Ok(())
    }

    /// Serialize to a WSC payload.
    ///
    /// # Errors
    ///
    /// Same as [`WifiCredential::new`], for credentials built field by field.
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut credential = BytesMut::new();
        put_tlv(&mut credential, ATTR_NETWORK_INDEX, &[0x01])?;
        put_tlv(&mut credential, ATTR_SSID, self.ssid.as_bytes())?;
        put_tlv(&mut credential, ATTR_AUTH_TYPE, &self.security.auth_type().to_be_bytes())?;
        put_tlv(
            &mut credential,
            ATTR_ENCRYPTION_TYPE,
            &self.security.encryption_type().to_be_bytes(),
        )?;
        put_tlv(&mut credential, ATTR_NETWORK_KEY, self.password.as_bytes())?;
        put_tlv(&mut credential, ATTR_MAC_ADDRESS, &ANY_MAC_ADDRESS)?;

        let mut payload = BytesMut::with_capacity(credential.len() + 9);
        put_tlv(&mut payload, ATTR_VERSION, &[WSC_VERSION])?;
        put_tlv(&mut payload, ATTR_CREDENTIAL, &credential)?;
        Ok(payload.to_vec())
    }

    /// Parse the first credential in a WSC payload.
    ///
    /// Returns `None` when no credential with an SSID can be found.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        let credential = read_tlvs(payload)
            .into_iter()
            .find(|(attr, _)| *attr == ATTR_CREDENTIAL)?
            .1;

        let mut ssid = None;
        let mut password = String::new();
        let mut auth_type = AUTH_OPEN;
        let mut encryption_type = ENCRYPTION_NONE;

        for (attr, value) in read_tlvs(credential) {
            match attr {
                ATTR_SSID => ssid = Some(String::from_utf8_lossy(value).into_owned()),
                ATTR_NETWORK_KEY => password = String::from_utf8_lossy(value).into_owned(),
                ATTR_AUTH_TYPE if value.len() == 2 => {
                    auth_type = u16::from_be_bytes([value[0], value[1]])
                }
                ATTR_ENCRYPTION_TYPE if value.len() == 2 => {
                    encryption_type = u16::from_be_bytes([value[0], value[1]])
                }
                _ => {}
            }
        }

        Some(Self {
            ssid: ssid?,
            password,
            security: WifiSecurity::from_wire(auth_type, encryption_type),
        })
    }
}

fn put_tlv(buf: &mut BytesMut, attr: u16, value: &[u8]) -> Result<()> {
    let len = u16::try_from(value.len()).map_err(|_| {
        Error::malformed(format!(
            "WSC attribute {attr:#06x} is {} bytes, over the TLV limit",
            value.len()
        ))
    })?;
    buf.put_u16(attr);
    buf.put_u16(len);
    buf.put_slice(value);
    Ok(())
}

/// Split a TLV list, stopping at the first truncated entry.
fn read_tlvs(mut buf: &[u8]) -> Vec<(u16, &[u8])> {
    let mut out = Vec::new();
    while buf.remaining() >= 4 {
        let attr = buf.get_u16();
        let len = buf.get_u16() as usize;
        if buf.remaining() < len {
            break;
        }
        out.push((attr, &buf[..len]));
        buf.advance(len);
    }
    out
}
