//! # FocusFlow Core Library
//!
//! Client-side orchestration core for the FocusFlow productivity timer: a
//! wall-clock-accurate countdown engine, a focus/break session state machine
//! coordinating an external posture/exercise backend, a posture-metric
//! aggregator, and durable local history that survives independent client
//! lifecycles.
//!
//! ## Architecture
//!
//! - **Timer Engine**: wall-clock-anchored countdown; the caller drives it by
//!   invoking `tick()` periodically
//! - **Session Controller**: Setup -> FocusActive -> BreakActive state machine
//!   owning the timer, the aggregator and the durable store
//! - **Metric Aggregator**: normalizes and averages noisy posture samples
//! - **Storage**: SQLite-backed key/value store for stats, history and the
//!   cross-lifecycle hand-off flag; TOML-based configuration
//! - **Backend Client**: polled HTTP status/results endpoints, best-effort
//!   start/stop
//!
//! The backend computes posture scores and rep counts; this crate only
//! consumes, aggregates and persists them.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod session;
pub mod storage;
pub mod timer;

pub use api::{BackendClient, ExerciseResult, SessionStatus};
pub use config::Config;
pub use error::{ApiError, ConfigError, CoreError, StorageError};
pub use events::Event;
pub use metrics::{MetricAggregator, PostureScore};
pub use session::{Phase, SessionConfig, SessionController, StartOutcome};
pub use storage::{Database, HistoryStore, SessionRecord, Stats, StatsStore};
pub use timer::{SessionType, TimerEngine, TimerState};
