//! Minimal vCard 3.0 contact cards (`FN`, `TEL`, `EMAIL`).

use serde::{Deserialize, Serialize};

const CRLF: &str = "\r\n";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Contact {
    pub fn new(name: &str, phone: &str, email: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            email: Some(email.to_string()),
        }
    }

    /// Render as a vCard 3.0 document with CRLF line endings.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagkit_ndef::vcard::Contact;
    ///
    /// let card = Contact::new("Doe, John", "+1", "j@d.io").to_vcard();
    /// assert!(card.contains("FN:Doe\\, John\r\n"));
    /// ```
    pub fn to_vcard(&self) -> String {
        let mut card = String::new();
        card.push_str("BEGIN:VCARD");
        card.push_str(CRLF);
        card.push_str("VERSION:3.0");
        card.push_str(CRLF);
        for (property, value) in [("FN", &self.name), ("TEL", &self.phone), ("EMAIL", &self.email)] {
            if let Some(value) = value {
                card.push_str(property);
                card.push(':');
                card.push_str(&escape(value));
                card.push_str(CRLF);
            }
        }
        card.push_str("END:VCARD");
        card.push_str(CRLF);
        card
    }

    /// Pick `FN`, `TEL` and `EMAIL` out of a vCard, first occurrence wins.
    ///
    /// Parameters (`TEL;TYPE=CELL:`) and group prefixes (`item1.EMAIL:`) are
    /// ignored. Returns `None` if the text is not a vCard.
    pub fn parse(card: &str) -> Option<Self> {
        let lines = unfold(card);
        if !lines
            .iter()
            .any(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCARD"))
        {
            return None;
        }

        let mut contact = Contact::default();
        for line in &lines {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let property = key.split(';').next().unwrap_or(key);
            let property = property.rsplit('.').next().unwrap_or(property);

            let slot = match property.to_ascii_uppercase().as_str() {
                "FN" => &mut contact.name,
                "TEL" => &mut contact.phone,
                "EMAIL" => &mut contact.email,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(unescape(value.trim_end()));
            }
        }
        Some(contact)
    }

    /// Present fields in name, phone, email order.
    pub fn present_fields(&self) -> Vec<&str> {
        [&self.name, &self.phone, &self.email]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Join folded continuation lines (leading space or tab).
fn unfold(card: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in card.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        match (raw.strip_prefix([' ', '\t']), lines.last_mut()) {
            (Some(rest), Some(last)) => last.push_str(rest),
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}
