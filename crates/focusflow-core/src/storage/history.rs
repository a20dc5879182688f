//! Append-only session history.
//!
//! One record per completed break, merging the session's configuration with
//! the finalized exercise result. Records are never mutated after creation;
//! the only deletion is a full clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{keys, Database};
use crate::error::StorageError;

/// One persisted history entry for a completed focus+break cycle.
///
/// Serialized in camelCase to match the durable-store format this log has
/// always used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub focus_seconds: u32,
    pub break_seconds: u32,
    pub started_at: DateTime<Utc>,
    pub exercise_type: String,
    pub reps: u32,
    pub goal: u32,
    pub duration_seconds: u32,
    pub completed: bool,
    /// Finalized posture average for the focus interval, when one was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posture_average: Option<u8>,
    pub timestamp: DateTime<Utc>,
}

/// View over the durable `sessionHistory` key.
pub struct HistoryStore<'a> {
    db: &'a Database,
}

impl<'a> HistoryStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Full history in insertion order. Absent or corrupt data loads as empty.
    pub fn load(&self) -> Result<Vec<SessionRecord>, StorageError> {
        Ok(self
            .db
            .get_json(keys::SESSION_HISTORY)?
            .unwrap_or_default())
    }

    /// Append one record, preserving insertion order.
    pub fn append(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut records = self.load()?;
        records.push(record.clone());
        self.db.put_json(keys::SESSION_HISTORY, &records)
    }

    /// The `limit` most recent records, most recent first.
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, StorageError> {
        let mut records = self.load()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    /// Empty the log.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.db.kv_delete(keys::SESSION_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, reps: u32) -> SessionRecord {
        SessionRecord {
            title: Some(title.to_string()),
            focus_seconds: 1500,
            break_seconds: 600,
            started_at: Utc::now(),
            exercise_type: "squats".to_string(),
            reps,
            goal: 20,
            duration_seconds: 600,
            completed: reps >= 20,
            posture_average: Some(80),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn append_then_load_preserves_order() {
        let db = Database::open_memory().unwrap();
        let store = HistoryStore::new(&db);

        for i in 0..4 {
            store.append(&record(&format!("session {i}"), i)).unwrap();
        }

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 4);
        for (i, rec) in loaded.iter().enumerate() {
            assert_eq!(rec.title.as_deref(), Some(format!("session {i}").as_str()));
        }
    }

    #[test]
    fn recent_is_reverse_chronological_and_bounded() {
        let db = Database::open_memory().unwrap();
        let store = HistoryStore::new(&db);
        for i in 0..8 {
            store.append(&record(&format!("s{i}"), i)).unwrap();
        }
        let recent = store.recent(5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title.as_deref(), Some("s7"));
        assert_eq!(recent[4].title.as_deref(), Some("s3"));
    }

    #[test]
    fn clear_empties_the_log() {
        let db = Database::open_memory().unwrap();
        let store = HistoryStore::new(&db);
        store.append(&record("a", 1)).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_history_loads_as_empty() {
        let db = Database::open_memory().unwrap();
        db.kv_set(keys::SESSION_HISTORY, "[{broken").unwrap();
        let store = HistoryStore::new(&db);
        assert!(store.load().unwrap().is_empty());
        // Appending over corruption starts a fresh log.
        store.append(&record("fresh", 2)).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
