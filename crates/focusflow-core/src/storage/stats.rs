//! Persistent session statistics and the completed-session hand-off flag.
//!
//! `completedSessionsIncrement` is a small durable message queue: the break
//! context queues an increment when a focus session completes, and the next
//! entry into the setup context consumes it exactly once. The queue exists
//! because the two contexts are independent lifecycles with no shared memory.

use serde::{Deserialize, Serialize};

use super::{keys, Database};
use crate::error::StorageError;

/// Aggregate statistics shown on the setup screen.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Monotonically non-decreasing across reloads.
    pub completed_sessions: u64,
    /// Live average for the current focus session; reset at each session start.
    pub average_posture: u8,
}

/// View over the durable `stats` and `completedSessionsIncrement` keys.
pub struct StatsStore<'a> {
    db: &'a Database,
}

impl<'a> StatsStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Load stats; absent or corrupt data yields the defaults.
    pub fn load(&self) -> Result<Stats, StorageError> {
        Ok(self.db.get_json(keys::STATS)?.unwrap_or_default())
    }

    pub fn save(&self, stats: &Stats) -> Result<(), StorageError> {
        self.db.put_json(keys::STATS, stats)
    }

    /// Queue completed-session increments for the next setup entry.
    pub fn set_pending_increment(&self, count: u64) -> Result<(), StorageError> {
        self.db
            .put_json(keys::COMPLETED_SESSIONS_INCREMENT, &count)
    }

    /// Read and clear the pending increment. Absent or corrupt yields 0.
    /// Calling twice without a new queue entry therefore applies +0 the
    /// second time.
    pub fn consume_pending_increment(&self) -> Result<u64, StorageError> {
        let queued: u64 = self
            .db
            .get_json(keys::COMPLETED_SESSIONS_INCREMENT)?
            .unwrap_or(0);
        self.db.kv_delete(keys::COMPLETED_SESSIONS_INCREMENT)?;
        Ok(queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let db = Database::open_memory().unwrap();
        let store = StatsStore::new(&db);
        assert_eq!(store.load().unwrap(), Stats::default());
    }

    #[test]
    fn save_then_load() {
        let db = Database::open_memory().unwrap();
        let store = StatsStore::new(&db);
        let stats = Stats {
            completed_sessions: 7,
            average_posture: 82,
        };
        store.save(&stats).unwrap();
        assert_eq!(store.load().unwrap(), stats);
    }

    #[test]
    fn increment_consumed_exactly_once() {
        let db = Database::open_memory().unwrap();
        let store = StatsStore::new(&db);

        store.set_pending_increment(1).unwrap();

        let mut stats = store.load().unwrap();
        stats.completed_sessions += store.consume_pending_increment().unwrap();
        store.save(&stats).unwrap();
        assert_eq!(store.load().unwrap().completed_sessions, 1);

        // Second consumption cycle with no new flag applies +0.
        let mut stats = store.load().unwrap();
        stats.completed_sessions += store.consume_pending_increment().unwrap();
        store.save(&stats).unwrap();
        assert_eq!(store.load().unwrap().completed_sessions, 1);
    }

    #[test]
    fn corrupt_stats_load_as_default() {
        let db = Database::open_memory().unwrap();
        db.kv_set(keys::STATS, "not json at all").unwrap();
        let store = StatsStore::new(&db);
        assert_eq!(store.load().unwrap(), Stats::default());
    }

    #[test]
    fn corrupt_increment_reads_as_zero() {
        let db = Database::open_memory().unwrap();
        db.kv_set(keys::COMPLETED_SESSIONS_INCREMENT, "\"nope\"").unwrap();
        let store = StatsStore::new(&db);
        assert_eq!(store.consume_pending_increment().unwrap(), 0);
    }
}
