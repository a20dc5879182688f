use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::SessionRecord;
use crate::timer::{SessionType, TimerState};

/// Every transition in the timer and session controller produces an Event.
/// The CLI prints these as JSON; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Emitted exactly once per run, when remaining reaches zero while running.
    TimerCompleted {
        session_type: SessionType,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Focus interval finished: average finalized, break handed off.
    FocusFinished {
        posture_average: u8,
        /// Break duration in `MM:SS`, the navigation parameter for the break context.
        break_param: String,
        at: DateTime<Utc>,
    },
    /// Break interval finished: one record appended to history.
    BreakFinished {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        session_type: SessionType,
        remaining_secs: u32,
        total_secs: u32,
        at: DateTime<Utc>,
    },
}
