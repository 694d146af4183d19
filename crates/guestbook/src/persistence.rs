//! Persistence accessor for the guestbook sequence.
//!
//! The whole sequence lives in one named slot as a JSON array. Loading is
//! forgiving: an absent or unreadable slot yields an empty sequence and
//! individual malformed entries are dropped. Writes report failures.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::{iso8601, GuestRecord, RecordId};
use crate::storage::SlotBackend;

/// Default name of the slot holding the sequence.
pub const DEFAULT_SLOT_KEY: &str = "guests";

/// Shape of an entry as found in the slot.
///
/// `id` is optional so sequences written before ids existed still load.
#[derive(Debug, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: Option<RecordId>,
    name: String,
    message: String,
    #[serde(default)]
    attended: bool,
    #[serde(with = "iso8601")]
    timestamp: DateTime<Utc>,
}

/// Reads and writes the guestbook sequence in a single slot.
#[derive(Debug)]
pub struct GuestStore<B> {
    backend: B,
    key: String,
}

impl<B: SlotBackend> GuestStore<B> {
    /// Create an accessor for the slot named `key`.
    #[must_use]
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The slot name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the underlying backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Load the sequence.
    ///
    /// Never fails: an absent slot, a read error or a value that is not a
    /// JSON array all yield an empty sequence.
    #[must_use]
    pub fn load(&self) -> Vec<GuestRecord> {
        let raw = match self.backend.read_slot(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Slot '{}' is empty", self.key);
                return Vec::new();
            }
            Err(e) => {
                warn!(slot = %self.key, error = %e, "Failed to read slot, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(items) => decode_records(items),
            Err(e) => {
                warn!(slot = %self.key, error = %e, "Slot does not hold a JSON array, starting empty");
                Vec::new()
            }
        }
    }

    /// Serialize the sequence and overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save(&mut self, records: &[GuestRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.backend.write_slot(&self.key, &json)?;
        debug!("Saved {} records to slot '{}'", records.len(), self.key);
        Ok(())
    }

    /// Remove the slot entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend removal fails.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove_slot(&self.key)?;
        Ok(())
    }
}

/// Decode array elements into records, dropping the ones that don't fit.
///
/// Missing or duplicate ids are derived from the entry's fields and position.
fn decode_records(items: Vec<Value>) -> Vec<GuestRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(items.len());

    for (position, item) in items.into_iter().enumerate() {
        let stored = match serde_json::from_value::<StoredRecord>(item) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(position, error = %e, "Skipping malformed guest entry");
                continue;
            }
        };

        let name = stored.name.trim().to_string();
        let message = stored.message.trim().to_string();
        if name.is_empty() || message.is_empty() {
            warn!(position, "Skipping guest entry with empty name or message");
            continue;
        }

        let mut salt = position as u64;
        let mut id = stored
            .id
            .unwrap_or_else(|| RecordId::derive(&name, &message, &stored.timestamp, salt));
        while seen.contains(&id) {
            salt += 1;
            id = RecordId::derive(&name, &message, &stored.timestamp, salt);
        }
        seen.insert(id.clone());

        records.push(GuestRecord {
            id,
            name,
            message,
            attended: stored.attended,
            timestamp: stored.timestamp,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::Storage;
    use chrono::TimeZone;

    fn create_test_store() -> GuestStore<Storage> {
        GuestStore::new(
            Storage::open_in_memory().expect("failed to create test storage"),
            DEFAULT_SLOT_KEY,
        )
    }

    fn record_at(name: &str, message: &str, minute: u32) -> GuestRecord {
        let timestamp = Utc.with_ymd_and_hms(2026, 10, 19, 8, minute, 0).unwrap();
        GuestRecord::with_timestamp(name, message, false, timestamp)
    }

    /// Backend whose writes always fail.
    #[derive(Debug, Default)]
    struct ReadOnlySlots;

    impl SlotBackend for ReadOnlySlots {
        fn read_slot(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write_slot(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::internal("quota exceeded"))
        }

        fn remove_slot(&mut self, _key: &str) -> Result<bool> {
            Err(Error::internal("quota exceeded"))
        }
    }

    #[test]
    fn test_load_absent_slot() {
        let store = create_test_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order_and_fields() {
        let mut store = create_test_store();
        let mut first = record_at("Ana", "Hi", 2);
        first.attended = true;
        let records = vec![first, record_at("Budi", "Selamat", 1)];

        store.save(&records).unwrap();
        assert_eq!(store.load(), records);
    }

    #[test]
    fn test_save_empty_writes_empty_array() {
        let mut store = create_test_store();
        store.save(&[]).unwrap();

        assert_eq!(
            store.backend().read_slot(DEFAULT_SLOT_KEY).unwrap(),
            Some("[]".to_string())
        );
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_removes_slot() {
        let mut store = create_test_store();
        store.save(&[record_at("Ana", "Hi", 0)]).unwrap();
        store.clear().unwrap();

        assert_eq!(store.backend().read_slot(DEFAULT_SLOT_KEY).unwrap(), None);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_malformed_json() {
        let mut storage = Storage::open_in_memory().unwrap();
        storage.write_slot(DEFAULT_SLOT_KEY, "{not json").unwrap();
        let store = GuestStore::new(storage, DEFAULT_SLOT_KEY);

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_non_array_json() {
        for raw in ["null", "{}", "\"guests\"", "42"] {
            let mut storage = Storage::open_in_memory().unwrap();
            storage.write_slot(DEFAULT_SLOT_KEY, raw).unwrap();
            let store = GuestStore::new(storage, DEFAULT_SLOT_KEY);
            assert!(store.load().is_empty(), "expected empty for {raw}");
        }
    }

    #[test]
    fn test_load_legacy_entries_without_ids() {
        let raw = r#"[
            {"name":"Ana","message":"Hi","attended":false,"timestamp":"2026-10-19T08:30:00.000Z"},
            {"name":"Ana","message":"Hi","attended":true,"timestamp":"2026-10-19T08:30:00.000Z"}
        ]"#;
        let mut storage = Storage::open_in_memory().unwrap();
        storage.write_slot(DEFAULT_SLOT_KEY, raw).unwrap();
        let store = GuestStore::new(storage, DEFAULT_SLOT_KEY);

        let records = store.load();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
        assert!(records[1].attended);

        // Derived ids are stable across loads.
        assert_eq!(store.load(), records);
    }

    #[test]
    fn test_load_skips_malformed_entries() {
        let raw = r#"[
            {"name":"Ana","message":"Hi","timestamp":"2026-10-19T08:30:00.000Z"},
            {"name":"NoMessage","timestamp":"2026-10-19T08:30:00.000Z"},
            {"name":"BadTime","message":"x","timestamp":"soon"},
            {"name":"   ","message":"blank name","timestamp":"2026-10-19T08:30:00.000Z"},
            17,
            {"name":"Budi","message":"Halo","attended":true,"timestamp":"2026-10-18T08:30:00.000Z"}
        ]"#;
        let mut storage = Storage::open_in_memory().unwrap();
        storage.write_slot(DEFAULT_SLOT_KEY, raw).unwrap();
        let store = GuestStore::new(storage, DEFAULT_SLOT_KEY);

        let names: Vec<String> = store.load().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Ana", "Budi"]);
    }

    #[test]
    fn test_load_rederives_duplicate_ids() {
        let raw = r#"[
            {"id":"same","name":"Ana","message":"Hi","timestamp":"2026-10-19T08:30:00.000Z"},
            {"id":"same","name":"Budi","message":"Halo","timestamp":"2026-10-19T08:31:00.000Z"}
        ]"#;
        let mut storage = Storage::open_in_memory().unwrap();
        storage.write_slot(DEFAULT_SLOT_KEY, raw).unwrap();
        let store = GuestStore::new(storage, DEFAULT_SLOT_KEY);

        let records = store.load();
        assert_eq!(records[0].id, RecordId::from("same"));
        assert_ne!(records[1].id, RecordId::from("same"));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let mut store = GuestStore::new(ReadOnlySlots, DEFAULT_SLOT_KEY);
        let err = store.save(&[record_at("Ana", "Hi", 0)]).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert!(store.clear().is_err());
    }

    #[test]
    fn test_custom_slot_key() {
        let mut store = GuestStore::new(Storage::open_in_memory().unwrap(), "wedding");
        store.save(&[record_at("Ana", "Hi", 0)]).unwrap();

        assert_eq!(store.key(), "wedding");
        assert!(store.backend().read_slot("wedding").unwrap().is_some());
        assert!(store.backend().read_slot(DEFAULT_SLOT_KEY).unwrap().is_none());
    }
}
