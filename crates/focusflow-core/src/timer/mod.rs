pub mod engine;
pub mod format;

pub use engine::{TimerEngine, TimerState};
pub use format::{format_mmss, parse_mmss};

use serde::{Deserialize, Serialize};

/// Which interval a timer counts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Focus,
    Break,
}
