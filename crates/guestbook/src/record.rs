//! Core guestbook record types.
//!
//! This module defines the visitor entry stored in the guestbook, the stable
//! identifier used to address it, and the form input it is created from.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Number of hex characters kept from the BLAKE3 digest for a record id.
const ID_LEN: usize = 12;

/// Stable identifier of a guest record.
///
/// Assigned once when the record is created and never changed afterwards,
/// so controls rendered from an older view still address the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Derive an identifier from record fields and a salt.
    ///
    /// The salt lets callers pick another id when a derived one collides.
    #[must_use]
    pub fn derive(name: &str, message: &str, timestamp: &DateTime<Utc>, salt: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
        hasher.update(message.as_bytes());
        hasher.update(&[0]);
        hasher.update(timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
        hasher.update(&[0]);
        hasher.update(&salt.to_le_bytes());
        let hex = hasher.finalize().to_hex();
        Self(hex[..ID_LEN].to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One guestbook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
    /// Stable identifier.
    pub id: RecordId,

    /// Visitor name, trimmed and non-empty.
    pub name: String,

    /// Visitor message, trimmed and non-empty.
    pub message: String,

    /// Whether the visitor has attended.
    #[serde(default)]
    pub attended: bool,

    /// When the entry was created.
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

impl GuestRecord {
    /// Create a record stamped with the current time.
    ///
    /// The time is cut to milliseconds, the precision it is stored with.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>, attended: bool) -> Self {
        Self::with_timestamp(name, message, attended, Utc::now().trunc_subsecs(3))
    }

    /// Create a record with an explicit creation time.
    #[must_use]
    pub fn with_timestamp(
        name: impl Into<String>,
        message: impl Into<String>,
        attended: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let message = message.into();
        let id = RecordId::derive(&name, &message, &timestamp, 0);
        Self {
            id,
            name,
            message,
            attended,
            timestamp,
        }
    }

    /// Re-derive this record's id with a different salt.
    ///
    /// Only valid before the record has been persisted.
    pub fn rederive_id(&mut self, salt: u64) {
        self.id = RecordId::derive(&self.name, &self.message, &self.timestamp, salt);
    }

    /// The creation time in its stored ISO-8601 form.
    #[must_use]
    pub fn timestamp_iso(&self) -> String {
        iso8601::format(&self.timestamp)
    }
}

/// Values read from the guestbook input controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestForm {
    /// Raw name input.
    pub name: String,
    /// Raw message input.
    pub message: String,
    /// Attendance checkbox.
    pub attended: bool,
}

impl GuestForm {
    /// Create a form from raw input values.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>, attended: bool) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            attended,
        }
    }

    /// Trimmed name.
    #[must_use]
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// Trimmed message.
    #[must_use]
    pub fn trimmed_message(&self) -> &str {
        self.message.trim()
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format a timestamp the way it is stored.
    #[must_use]
    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Serialize a timestamp.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        timestamp: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(timestamp))
    }

    /// Deserialize a timestamp from any RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid RFC 3339 timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
