pub mod controller;

pub use controller::{Phase, SessionController, StartOutcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration captured at session start.
///
/// Read-only for the lifetime of the session; superseded by the next start.
/// Persisted under `currentSessionConfig` so the break context can merge it
/// into the history record even when it runs in a separate process lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub focus_seconds: u32,
    pub break_seconds: u32,
    pub started_at: DateTime<Utc>,
}
