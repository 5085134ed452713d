/**
 * Contact Message Data Structure
 *
 * Messages are written to the sheet by the public contact form; the admin
 * side only reads them, moves them between statuses and deletes them.
 */
use crate::shared::record::{opt_record_id, opt_text_or_number, text_or_number, RecordId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reading status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Not yet seen by the operator
    #[default]
    Nouveau,
    /// Seen
    Lu,
    /// Moved out of the inbox
    Archive,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Nouveau => "nouveau",
            MessageStatus::Lu => "lu",
            MessageStatus::Archive => "archive",
        }
    }

    fn from_sheet(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lu" => MessageStatus::Lu,
            "archive" => MessageStatus::Archive,
            _ => MessageStatus::Nouveau,
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the sender would like to be answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContactPreference {
    Email,
    /// SMS or any other channel, kept verbatim
    Other(String),
}

impl From<String> for ContactPreference {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("email") {
            ContactPreference::Email
        } else {
            ContactPreference::Other(raw)
        }
    }
}

impl From<ContactPreference> for String {
    fn from(pref: ContactPreference) -> Self {
        match pref {
            ContactPreference::Email => "email".to_string(),
            ContactPreference::Other(raw) => raw,
        }
    }
}

/// A message left through the contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SheetMessage")]
pub struct Message {
    pub id: RecordId,
    /// Sender name
    pub nom: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Message body
    pub message: String,
    /// Submission timestamp as stored in the sheet
    pub date: String,
    #[serde(rename = "preferenceContact", skip_serializing_if = "Option::is_none")]
    pub preference_contact: Option<ContactPreference>,
    pub statut: MessageStatus,
}

#[derive(Deserialize)]
struct SheetMessage {
    #[serde(default, deserialize_with = "opt_record_id")]
    id: Option<RecordId>,
    #[serde(default, deserialize_with = "text_or_number")]
    nom: String,
    #[serde(default, deserialize_with = "text_or_number")]
    email: String,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    message: String,
    #[serde(default, deserialize_with = "text_or_number")]
    date: String,
    #[serde(default, rename = "preferenceContact", deserialize_with = "opt_text_or_number")]
    preference_contact: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    statut: String,
}

impl From<SheetMessage> for Message {
    fn from(row: SheetMessage) -> Self {
        let id = row
            .id
            .unwrap_or_else(|| Message::legacy_id(&row.nom, &row.message));
        Self {
            id,
            nom: row.nom,
            email: row.email,
            phone: row.phone,
            message: row.message,
            date: row.date,
            preference_contact: row.preference_contact.map(ContactPreference::from),
            statut: MessageStatus::from_sheet(&row.statut),
        }
    }
}

impl Message {
    /// Id derived from the (sender, body) pair the sheet identifies rows by
    pub fn legacy_id(nom: &str, message: &str) -> RecordId {
        RecordId::from_natural_key("message", &[nom, message])
    }

    pub fn new(nom: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            nom: nom.into(),
            email: email.into(),
            phone: None,
            message: message.into(),
            date: Utc::now().to_rfc3339(),
            preference_contact: None,
            statut: MessageStatus::Nouveau,
        }
    }

    pub fn with_status(mut self, statut: MessageStatus) -> Self {
        self.statut = statut;
        self
    }

    pub fn is_unread(&self) -> bool {
        self.statut == MessageStatus::Nouveau
    }

    pub fn is_archived(&self) -> bool {
        self.statut == MessageStatus::Archive
    }

    /// Submission time, when the sheet value is a recognisable timestamp
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Number of messages still marked `nouveau`
pub fn unread_count(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.is_unread()).count()
}
