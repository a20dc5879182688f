pub mod database;
pub mod history;
pub mod stats;

pub use database::Database;
pub use history::{HistoryStore, SessionRecord};
pub use stats::{Stats, StatsStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable key names. These are the only channel for passing state across
/// independent client lifecycles, so they are fixed strings.
pub mod keys {
    pub const STATS: &str = "stats";
    pub const SESSION_HISTORY: &str = "sessionHistory";
    pub const CURRENT_SESSION_CONFIG: &str = "currentSessionConfig";
    pub const COMPLETED_SESSIONS_INCREMENT: &str = "completedSessionsIncrement";
    pub const LAST_POSTURE_AVERAGE: &str = "lastPostureAverage";
}

/// Returns `~/.config/focusflow[-dev]/` based on FOCUSFLOW_ENV.
///
/// Set FOCUSFLOW_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusflow-dev")
    } else {
        base_dir.join("focusflow")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
