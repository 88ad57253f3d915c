use crate::{Error, FailureKind, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Format a raw tag identifier as an uppercase hex string.
///
/// # Examples
///
/// ```
/// use tagkit_core::format_tag_id;
///
/// assert_eq!(format_tag_id(&[0x04, 0xAB, 0xCD, 0xEF]), "04ABCDEF");
/// ```
pub fn format_tag_id(id: &[u8]) -> String {
    id.iter().map(|b| format!("{:02X}", b)).collect()
}

/// A capability reported by the platform for a discovered tag.
///
/// Serialized by name (`NDEF`, `MIFARE_CLASSIC`, ...). Names the platform
/// reports that are not listed here are kept verbatim in [`Technology::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Technology {
    Ndef,
    NdefFormatable,
    NfcA,
    NfcB,
    NfcF,
    NfcV,
    IsoDep,
    MifareClassic,
    MifareUltralight,
    Other(String),
}

impl Technology {
    /// Canonical name of the technology.
    pub fn name(&self) -> &str {
        match self {
            Self::Ndef => "NDEF",
            Self::NdefFormatable => "NDEF_FORMATABLE",
            Self::NfcA => "NFC_A",
            Self::NfcB => "NFC_B",
            Self::NfcF => "NFC_F",
            Self::NfcV => "NFC_V",
            Self::IsoDep => "ISO_DEP",
            Self::MifareClassic => "MIFARE_CLASSIC",
            Self::MifareUltralight => "MIFARE_ULTRALIGHT",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Technology {
    fn from(name: &str) -> Self {
        match name {
            "NDEF" => Self::Ndef,
            "NDEF_FORMATABLE" => Self::NdefFormatable,
            "NFC_A" => Self::NfcA,
            "NFC_B" => Self::NfcB,
            "NFC_F" => Self::NfcF,
            "NFC_V" => Self::NfcV,
            "ISO_DEP" => Self::IsoDep,
            "MIFARE_CLASSIC" => Self::MifareClassic,
            "MIFARE_ULTRALIGHT" => Self::MifareUltralight,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Technology {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Technology> for String {
    fn from(technology: Technology) -> Self {
        technology.name().to_string()
    }
}

/// Immutable record of one physical tag encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSnapshot {
    /// Uppercase hex identifier, absent when the platform does not expose one.
    pub id: Option<String>,

    /// Technologies in the order the platform reported them.
    pub technologies: Vec<Technology>,

    /// One display string per NDEF record, in on-tag order.
    pub payloads: Vec<String>,

    /// When the tag entered the field.
    pub discovered_at: DateTime<Utc>,
}

impl TagSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(id: Option<&[u8]>, technologies: Vec<Technology>, payloads: Vec<String>) -> Self {
        Self {
            id: id.map(format_tag_id),
            technologies,
            payloads,
            discovered_at: Utc::now(),
        }
    }

    /// Replace the discovery timestamp, for replaying recorded encounters.
    pub fn with_discovered_at(mut self, discovered_at: DateTime<Utc>) -> Self {
        self.discovered_at = discovered_at;
        self
    }

    /// Whether the tag reported NDEF support.
    pub fn is_ndef(&self) -> bool {
        self.technologies.contains(&Technology::Ndef)
    }

    /// Technology names in reported order.
    pub fn technology_names(&self) -> Vec<&str> {
        self.technologies.iter().map(Technology::name).collect()
    }
}

/// The eight write templates a client can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateType {
    Text,
    Url,
    Wifi,
    Contact,
    Sms,
    Email,
    Phone,
    App,
}

impl TemplateType {
    pub const ALL: [TemplateType; 8] = [
        TemplateType::Text,
        TemplateType::Url,
        TemplateType::Wifi,
        TemplateType::Contact,
        TemplateType::Sms,
        TemplateType::Email,
        TemplateType::Phone,
        TemplateType::App,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Url => "URL",
            Self::Wifi => "WIFI",
            Self::Contact => "CONTACT",
            Self::Sms => "SMS",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::App => "APP",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TemplateType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_field_value("templateType", s, "unknown template type"))
    }
}

/// A named, typed write intent as supplied by the client.
///
/// Field values are untyped strings; [`tagkit_ndef`] validates them against
/// the template's required-field contract when encoding.
///
/// # Examples
///
/// ```
/// use tagkit_core::{TemplateType, WriteTemplate};
///
/// let template = WriteTemplate::new(TemplateType::Url)
///     .with_name("Website URL")
///     .with_field("url", "https://example.com");
///
/// assert_eq!(template.field("url"), Some("https://example.com"));
/// ```
///
/// [`tagkit_ndef`]: https://docs.rs/tagkit-ndef
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteTemplate {
    pub template_type: TemplateType,

    /// Optional display name, e.g. "Website URL".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl WriteTemplate {
    pub fn new(template_type: TemplateType) -> Self {
        Self {
            template_type,
            name: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Raw field value, if set.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field value that must be present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTemplate` naming the field when it is missing
    /// or only whitespace.
    pub fn required_field(&self, key: &str) -> Result<&str> {
        self.optional_field(key)
            .ok_or_else(|| Error::invalid_template(self.template_type.as_str(), key))
    }

    /// Field value if present and non-blank.
    pub fn optional_field(&self, key: &str) -> Option<&str> {
        self.field(key).filter(|value| !value.trim().is_empty())
    }
}

/// Destructive tag-lifecycle operation carried by a write session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagOperation {
    Erase,
    Format,
    MakeReadOnly,
}

impl fmt::Display for TagOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Erase => write!(f, "erase"),
            Self::Format => write!(f, "format"),
            Self::MakeReadOnly => write!(f, "make read-only"),
        }
    }
}

/// What a write session will do to the next tag it sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum WriteIntent {
    /// Encode one of the write templates.
    Template(WriteTemplate),

    /// Write a free-text message as a single text record.
    Text(String),

    /// Erase, format or lock the tag.
    Lifecycle(TagOperation),
}

impl WriteIntent {
    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Template(template) => format!("{} template", template.template_type),
            Self::Text(_) => "custom text".to_string(),
            Self::Lifecycle(operation) => operation.to_string(),
        }
    }
}

impl From<WriteTemplate> for WriteIntent {
    fn from(template: WriteTemplate) -> Self {
        Self::Template(template)
    }
}

impl From<TagOperation> for WriteIntent {
    fn from(operation: TagOperation) -> Self {
        Self::Lifecycle(operation)
    }
}

/// Hardware session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    #[default]
    Idle,
    Reading,
    Writing,
}

impl SessionMode {
    /// Check if a direct transition to `target` is allowed.
    ///
    /// Switching between reading and writing always passes through `Idle`
    /// so reader mode is released before it is claimed again.
    ///
    /// ```
    /// use tagkit_core::SessionMode;
    ///
    /// assert!(SessionMode::Idle.can_transition_to(SessionMode::Writing));
    /// assert!(!SessionMode::Reading.can_transition_to(SessionMode::Writing));
    /// ```
    pub fn can_transition_to(&self, target: SessionMode) -> bool {
        matches!(
            (self, target),
            (SessionMode::Idle, SessionMode::Reading | SessionMode::Writing)
                | (SessionMode::Reading | SessionMode::Writing, SessionMode::Idle)
        )
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Reading => write!(f, "Reading"),
            Self::Writing => write!(f, "Writing"),
        }
    }
}

/// Progress of a write-mode tag operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteProgress {
    Started,
    Finished,
}

/// Outcome of one write, erase, format or lock attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub success: bool,

    /// Human-readable outcome description.
    pub message: String,

    /// Hex id of the tag, when one was contacted and exposes an id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl WriteResult {
    pub fn success(message: impl Into<String>, tag_id: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            tag_id,
            failure: None,
        }
    }

    /// Build a failed result from the error that caused it.
    ///
    /// The tag id is dropped when the error means the tag left the field.
    pub fn failure(error: &Error, tag_id: Option<String>) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            tag_id: tag_id.filter(|_| error.tag_contacted()),
            failure: Some(error.failure_kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NDEF", Technology::Ndef)]
    #[case("MIFARE_CLASSIC", Technology::MifareClassic)]
    #[case("NDEF_FORMATABLE", Technology::NdefFormatable)]
    #[case("VENDOR_X", Technology::Other("VENDOR_X".to_string()))]
    fn test_technology_names(#[case] name: &str, #[case] expected: Technology) {
        let technology = Technology::from(name);
        assert_eq!(technology, expected);
        assert_eq!(technology.name(), name);
    }

    #[test]
    fn test_technology_serializes_by_name() {
        let json = serde_json::to_string(&vec![Technology::Ndef, Technology::MifareClassic]).unwrap();
        assert_eq!(json, r#"["NDEF","MIFARE_CLASSIC"]"#);

        let back: Vec<Technology> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Technology::Ndef, Technology::MifareClassic]);
    }

    #[test]
    fn test_snapshot_id_is_hex_or_absent() {
        let with_id = TagSnapshot::new(Some(&[0x04, 0xA1, 0x0F]), vec![Technology::NfcA], vec![]);
        assert_eq!(with_id.id.as_deref(), Some("04A10F"));
        assert!(!with_id.is_ndef());

        let without_id = TagSnapshot::new(None, vec![Technology::Ndef], vec![]);
        assert_eq!(without_id.id, None);
        assert!(without_id.is_ndef());
    }

    #[rstest]
    #[case("TEXT", TemplateType::Text)]
    #[case("wifi", TemplateType::Wifi)]
    #[case(" App ", TemplateType::App)]
    fn test_template_type_parse(#[case] input: &str, #[case] expected: TemplateType) {
        assert_eq!(input.parse::<TemplateType>().unwrap(), expected);
    }

    #[test]
    fn test_template_type_parse_unknown() {
        let error = "FAX".parse::<TemplateType>().unwrap_err();
        assert!(matches!(error, Error::InvalidFieldValue { .. }));
    }

    #[test]
    fn test_required_field_rejects_blank() {
        let template = WriteTemplate::new(TemplateType::Text).with_field("text", "   ");
        let error = template.required_field("text").unwrap_err();
        assert!(matches!(error, Error::InvalidTemplate { ref field, .. } if field == "text"));
    }

    #[test]
    fn test_write_template_json_shape() {
        let json = r#"{"templateType":"SMS","fields":{"phone":"+1234567890","message":"Hi"}}"#;
        let template: WriteTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.template_type, TemplateType::Sms);
        assert_eq!(template.field("phone"), Some("+1234567890"));
        assert_eq!(template.name, None);
    }

    #[test]
    fn test_failure_result_drops_id_for_lost_tag() {
        let lost = WriteResult::failure(&Error::TagRead("tag removed".into()), Some("04AB".into()));
        assert!(!lost.success);
        assert_eq!(lost.tag_id, None);
        assert_eq!(lost.failure, Some(FailureKind::TagLost));

        let locked = WriteResult::failure(&Error::AlreadyReadOnly, Some("04AB".into()));
        assert_eq!(locked.tag_id.as_deref(), Some("04AB"));
        assert_eq!(locked.message, "Tag is already read-only");
    }

    #[test]
    fn test_write_intent_describe() {
        let intent = WriteIntent::from(WriteTemplate::new(TemplateType::Phone));
        assert_eq!(intent.describe(), "PHONE template");
        assert_eq!(WriteIntent::Lifecycle(TagOperation::MakeReadOnly).describe(), "make read-only");
    }

    #[rstest]
    #[case(SessionMode::Idle, SessionMode::Reading, true)]
    #[case(SessionMode::Idle, SessionMode::Writing, true)]
    #[case(SessionMode::Reading, SessionMode::Idle, true)]
    #[case(SessionMode::Writing, SessionMode::Idle, true)]
    #[case(SessionMode::Reading, SessionMode::Writing, false)]
    #[case(SessionMode::Writing, SessionMode::Reading, false)]
    #[case(SessionMode::Idle, SessionMode::Idle, false)]
    fn test_session_mode_transitions(
        #[case] from: SessionMode,
        #[case] to: SessionMode,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }
}
