//! Record identity and lenient field decoding
//!
//! Rows coming back from the spreadsheet script may or may not carry an `id`
//! column. Rows that do keep it; rows that don't get an id derived from their
//! natural key, so the same row maps to the same id on every refresh.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace for ids derived from legacy natural keys
const LEGACY_NAMESPACE: Uuid = Uuid::from_u128(0x6d8f_2a41_93c7_4e0b_a5d2_1f7e_9c3b_8a60);

/// Stable opaque identifier of a product or message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Fresh id for a record created locally
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id for a row that arrived without one
    ///
    /// `parts` is the natural key; parts are separated by a NUL so that
    /// `("ab", "c")` and `("a", "bc")` do not collide.
    pub fn from_natural_key(kind: &str, parts: &[&str]) -> Self {
        let mut key = String::from(kind);
        for part in parts {
            key.push('\0');
            key.push_str(part);
        }
        Self(Uuid::new_v5(&LEGACY_NAMESPACE, key.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Loose::Text(s) => s,
            Loose::Int(n) => n.to_string(),
            Loose::Float(n) => n.to_string(),
            Loose::Bool(b) => b.to_string(),
        }
    }
}

/// Accept a JSON string or number and keep it as text
///
/// Spreadsheet cells holding prices or phone numbers are sent as numbers.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .unwrap_or_default())
}

/// Optional variant of [`text_or_number`]; empty cells become `None`
pub fn opt_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .filter(|s| !s.trim().is_empty()))
}

/// Lenient `id` column: UUIDs are kept, other non-empty values are hashed
/// into a stable id, empty cells become `None`
pub fn opt_record_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Loose>::deserialize(deserializer)? {
        Some(value) => value.into_text(),
        None => return Ok(None),
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(match Uuid::parse_str(raw) {
        Ok(uuid) => RecordId(uuid),
        Err(_) => RecordId::from_natural_key("id", &[raw]),
    }))
}
