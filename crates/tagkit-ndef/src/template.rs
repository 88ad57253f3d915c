//! Write templates turned into NDEF messages.
//!
//! A [`WriteTemplate`] is an untyped bag of fields coming from the client.
//! [`Template`] is the validated form: building one checks every required
//! field, so encoding itself cannot fail on user input.

use tagkit_core::{
    Error, Result, TemplateType, WriteTemplate,
    constants::{
        FIELD_BODY, FIELD_EMAIL, FIELD_MESSAGE, FIELD_NAME, FIELD_PACKAGE, FIELD_PASSWORD,
        FIELD_PHONE, FIELD_SECURITY, FIELD_SSID, FIELD_SUBJECT, FIELD_TEXT, FIELD_URL,
    },
};
use tracing::debug;

use crate::{
    message::NdefMessage,
    record::{MIME_VCARD, MIME_WIFI, NdefRecord},
    text::DEFAULT_LANGUAGE,
    uri::percent_encode,
    vcard::Contact,
    wifi::{WifiCredential, WifiSecurity},
};

/// A validated write template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Text {
        text: String,
    },
    Url {
        url: String,
    },
    Wifi(WifiCredential),
    Contact(Contact),
    Sms {
        phone: String,
        message: String,
    },
    Email {
        email: String,
        subject: Option<String>,
        body: Option<String>,
    },
    Phone {
        phone: String,
    },
    App {
        package: String,
    },
}

impl Template {
    pub fn template_type(&self) -> TemplateType {
        match self {
            Self::Text { .. } => TemplateType::Text,
            Self::Url { .. } => TemplateType::Url,
            Self::Wifi(_) => TemplateType::Wifi,
            Self::Contact(_) => TemplateType::Contact,
            Self::Sms { .. } => TemplateType::Sms,
            Self::Email { .. } => TemplateType::Email,
            Self::Phone { .. } => TemplateType::Phone,
            Self::App { .. } => TemplateType::App,
        }
    }

    /// The single record this template writes.
    ///
    /// # Errors
    ///
    /// Only a WIFI credential built outside [`Template::try_from`] can fail,
    /// with `Error::InvalidFieldValue` when it breaks the WSC length limits.
    pub fn to_record(&self) -> Result<NdefRecord> {
        Ok(match self {
            Self::Text { text } => NdefRecord::text(text, DEFAULT_LANGUAGE),
            Self::Url { url } => NdefRecord::uri(url),
            Self::Wifi(credential) => NdefRecord::mime(MIME_WIFI, credential.to_payload()?),
            Self::Contact(contact) => NdefRecord::mime(MIME_VCARD, contact.to_vcard().into_bytes()),
            Self::Sms { phone, message } => {
                NdefRecord::uri(&format!("sms:{phone}?body={}", percent_encode(message)))
            }
            Self::Email {
                email,
                subject,
                body,
            } => NdefRecord::uri(&mailto_uri(email, subject.as_deref(), body.as_deref())),
            Self::Phone { phone } => NdefRecord::uri(&format!("tel:{phone}")),
            Self::App { package } => NdefRecord::android_app(package),
        })
    }

    pub fn to_message(&self) -> Result<NdefMessage> {
        self.to_record().map(NdefMessage::single)
    }
}

impl TryFrom<&WriteTemplate> for Template {
    type Error = Error;

    fn try_from(template: &WriteTemplate) -> Result<Self> {
        let required = |key: &str| template.required_field(key).map(str::to_string);
        let optional = |key: &str| template.optional_field(key).map(str::to_string);

        Ok(match template.template_type {
            TemplateType::Text => Self::Text {
                text: required(FIELD_TEXT)?,
            },
            TemplateType::Url => Self::Url {
                url: required(FIELD_URL)?,
            },
            TemplateType::Wifi => {
                let ssid = required(FIELD_SSID)?;
                let password = required(FIELD_PASSWORD)?;
                let security: WifiSecurity = template.required_field(FIELD_SECURITY)?.parse()?;
                Self::Wifi(WifiCredential::new(ssid, password, security)?)
            }
            TemplateType::Contact => Self::Contact(Contact {
                name: Some(required(FIELD_NAME)?),
                phone: Some(required(FIELD_PHONE)?),
                email: Some(required(FIELD_EMAIL)?),
            }),
            TemplateType::Sms => Self::Sms {
                phone: required(FIELD_PHONE)?.trim().to_string(),
                message: required(FIELD_MESSAGE)?,
            },
            TemplateType::Email => Self::Email {
                email: required(FIELD_EMAIL)?.trim().to_string(),
                subject: optional(FIELD_SUBJECT),
                body: optional(FIELD_BODY),
            },
            TemplateType::Phone => Self::Phone {
                phone: required(FIELD_PHONE)?.trim().to_string(),
            },
            TemplateType::App => Self::App {
                package: required(FIELD_PACKAGE)?.trim().to_string(),
            },
        })
    }
}

fn mailto_uri(email: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let query: Vec<String> = [("subject", subject), ("body", body)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={}", percent_encode(v))))
        .collect();

    if query.is_empty() {
        format!("mailto:{email}")
    } else {
        format!("mailto:{email}?{}", query.join("&"))
    }
}

/// Validate a template and encode it.
///
/// # Errors
///
/// `Error::InvalidTemplate` when a required field is missing or blank,
/// `Error::InvalidFieldValue` for a WIFI security outside WPA/WPA2/WEP/NONE,
/// an SSID over 32 bytes or a password over 64 bytes.
///
/// # Examples
///
/// ```
/// use tagkit_core::{TemplateType, WriteTemplate};
/// use tagkit_ndef::encode_template;
///
/// let template = WriteTemplate::new(TemplateType::Phone).with_field("phone", "+1234567890");
/// let message = encode_template(&template).unwrap();
/// assert_eq!(message.records()[0].payload, b"\x05+1234567890");
/// ```
pub fn encode_template(template: &WriteTemplate) -> Result<NdefMessage> {
    let typed = Template::try_from(template)?;
    let message = typed.to_message()?;
    debug!(
        template = %typed.template_type(),
        records = message.len(),
        "Encoded write template"
    );
    Ok(message)
}

/// Encode a custom free-text message as a single text record.
///
/// # Errors
///
/// `Error::InvalidTemplate` when `text` is empty or only whitespace.
pub fn encode_text(text: &str) -> Result<NdefMessage> {
    if text.trim().is_empty() {
        return Err(Error::invalid_template(TemplateType::Text.as_str(), FIELD_TEXT));
    }
    Ok(NdefMessage::single(NdefRecord::text(text, DEFAULT_LANGUAGE)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EXTERNAL_ANDROID_APP, RTD_TEXT, RTD_URI, Tnf};
    use rstest::rstest;

    fn template(kind: TemplateType, fields: &[(&str, &str)]) -> WriteTemplate {
        fields
            .iter()
            .fold(WriteTemplate::new(kind), |t, (k, v)| t.with_field(*k, *v))
    }

    #[test]
    fn test_text_template() {
        let message = encode_template(&template(TemplateType::Text, &[("text", "Hello")])).unwrap();
        assert_eq!(message.len(), 1);
        assert!(message.records()[0].is(Tnf::WellKnown, RTD_TEXT));
        assert_eq!(message.records()[0].payload, b"\x02enHello");
    }

    #[test]
    fn test_custom_text_matches_text_template() {
        let custom = encode_text("Hello").unwrap();
        let templated = encode_template(&template(TemplateType::Text, &[("text", "Hello")])).unwrap();
        assert_eq!(custom, templated);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_custom_text_rejects_blank(#[case] text: &str) {
        assert!(matches!(encode_text(text), Err(Error::InvalidTemplate { .. })));
    }

    #[test]
    fn test_sms_uri() {
        let message = encode_template(&template(
            TemplateType::Sms,
            &[("phone", "+1234567890"), ("message", "Hello from NFC!")],
        ))
        .unwrap();
        let record = &message.records()[0];
        assert!(record.is(Tnf::WellKnown, RTD_URI));
        assert_eq!(record.payload, b"\x00sms:+1234567890?body=Hello%20from%20NFC%21");
    }

    #[rstest]
    #[case(&[("email", "a@b.c")], "a@b.c")]
    #[case(&[("email", "a@b.c"), ("subject", "Hi there")], "a@b.c?subject=Hi%20there")]
    #[case(&[("email", "a@b.c"), ("body", "x&y")], "a@b.c?body=x%26y")]
    #[case(
        &[("email", "a@b.c"), ("subject", "S"), ("body", "B")],
        "a@b.c?subject=S&body=B"
    )]
    #[case(&[("email", "a@b.c"), ("subject", "  ")], "a@b.c")]
    fn test_email_uri(#[case] fields: &[(&str, &str)], #[case] expected: &str) {
        let message = encode_template(&template(TemplateType::Email, fields)).unwrap();
        let payload = &message.records()[0].payload;
        assert_eq!(payload[0], 0x06);
        assert_eq!(std::str::from_utf8(&payload[1..]).unwrap(), expected);
    }

    #[test]
    fn test_app_record() {
        let message =
            encode_template(&template(TemplateType::App, &[("package", "com.example.app")])).unwrap();
        assert!(message.records()[0].is(Tnf::External, EXTERNAL_ANDROID_APP));
    }

    #[test]
    fn test_wifi_record() {
        let message = encode_template(&template(
            TemplateType::Wifi,
            &[("ssid", "MyWiFi"), ("password", "password123"), ("security", "wpa2")],
        ))
        .unwrap();
        let record = &message.records()[0];
        assert_eq!(record.media_type().as_deref(), Some(MIME_WIFI));
        let credential = WifiCredential::from_payload(&record.payload).unwrap();
        assert_eq!(credential.security, WifiSecurity::Wpa2);
    }

    #[rstest]
    #[case(TemplateType::Text, &[], "text")]
    #[case(TemplateType::Url, &[("url", "")], "url")]
    #[case(TemplateType::Wifi, &[("ssid", "x"), ("security", "WPA")], "password")]
    #[case(TemplateType::Contact, &[("name", "n"), ("phone", "p")], "email")]
    #[case(TemplateType::Sms, &[("phone", "1")], "message")]
    #[case(TemplateType::Email, &[("subject", "s")], "email")]
    #[case(TemplateType::Phone, &[("phone", " ")], "phone")]
    #[case(TemplateType::App, &[], "package")]
    fn test_missing_required_field(
        #[case] kind: TemplateType,
        #[case] fields: &[(&str, &str)],
        #[case] missing: &str,
    ) {
        match encode_template(&template(kind, fields)) {
            Err(Error::InvalidTemplate { field, .. }) => assert_eq!(field, missing),
            other => panic!("expected InvalidTemplate, got {other:?}"),
        }
    }

    #[test]
    fn test_url_is_encoded_as_given() {
        let message =
            encode_template(&template(TemplateType::Url, &[("url", " https://example.com/a b ")]))
                .unwrap();
        let record = &message.records()[0];
        assert_eq!(record.payload[0], 0x00);
        assert_eq!(&record.payload[1..], b" https://example.com/a b ");
    }

    #[test]
    fn test_wifi_bogus_security() {
        let result = encode_template(&template(
            TemplateType::Wifi,
            &[("ssid", "x"), ("password", "y"), ("security", "BOGUS")],
        ));
        assert!(matches!(result, Err(Error::InvalidFieldValue { .. })));
    }
}
