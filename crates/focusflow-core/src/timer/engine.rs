//! Timer engine implementation.
//!
//! The engine is a wall-clock-anchored countdown. It does not use internal
//! threads - the caller is responsible for calling `tick()` periodically
//! (every 0.5-1s).
//!
//! On each run start the engine computes an absolute target timestamp
//! (`now + remaining`). Every tick recomputes remaining from that fixed
//! anchor instead of decrementing a counter, so tick-scheduling jitter or a
//! throttled host cannot accumulate drift. Pausing discards the anchor and
//! freezes the last computed remaining value; resuming derives a fresh anchor
//! from it. A pause of any real-world length therefore leaves remaining
//! untouched.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Completed
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::SessionType;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Core countdown engine.
///
/// Operates on wall-clock anchors -- no internal thread. The caller is
/// responsible for calling `tick()` periodically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    session_type: SessionType,
    state: TimerState,
    /// Configured duration for the current run, in seconds.
    duration_secs: u32,
    /// Remaining time in seconds; never goes below zero.
    remaining_secs: u32,
    /// Absolute completion timestamp (ms since epoch) for the current run.
    /// `None` while idle, paused or completed.
    #[serde(default)]
    target_epoch_ms: Option<u64>,
}

impl TimerEngine {
    /// Create a new engine in the `Idle` state with no duration armed.
    pub fn new(session_type: SessionType) -> Self {
        Self {
            session_type,
            state: TimerState::Idle,
            duration_secs: 0,
            remaining_secs: 0,
            target_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            session_type: self.session_type,
            remaining_secs: self.remaining_secs,
            total_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm and start a fresh run of `duration_secs`.
    ///
    /// Starting is the only way to re-arm completion: a `Completed` engine
    /// stays completed until the next `start`. Returns `None` if already
    /// running.
    pub fn start(&mut self, duration_secs: u32) -> Option<Event> {
        if self.state == TimerState::Running {
            return None;
        }
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.target_epoch_ms = Some(now_ms() + u64::from(duration_secs) * 1000);
        self.state = TimerState::Running;
        Some(Event::TimerStarted {
            session_type: self.session_type,
            duration_secs,
            at: Utc::now(),
        })
    }

    /// Freeze the countdown: discard the anchor, keep the last remaining value.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.compute_remaining();
        self.target_epoch_ms = None;
        self.state = TimerState::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Resume from pause by deriving a new anchor from the frozen remaining value.
    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.target_epoch_ms = Some(now_ms() + u64::from(self.remaining_secs) * 1000);
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Restore remaining to the configured duration and clear any running anchor.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.remaining_secs = self.duration_secs;
        self.target_epoch_ms = None;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Change the armed duration while idle. No-op in any other state.
    pub fn set_duration(&mut self, duration_secs: u32) {
        if self.state == TimerState::Idle {
            self.duration_secs = duration_secs;
            self.remaining_secs = duration_secs;
            self.target_epoch_ms = None;
        }
    }

    /// Call periodically while running. Returns `Some(Event::TimerCompleted)`
    /// exactly once, on the tick where remaining reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.compute_remaining();
        if self.remaining_secs == 0 {
            self.state = TimerState::Completed;
            self.target_epoch_ms = None;
            return Some(Event::TimerCompleted {
                session_type: self.session_type,
                at: Utc::now(),
            });
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// remaining = max(0, round((target - now) / 1000))
    fn compute_remaining(&self) -> u32 {
        let Some(target) = self.target_epoch_ms else {
            return self.remaining_secs;
        };
        let now = now_ms();
        if target <= now {
            return 0;
        }
        let diff_ms = target - now;
        // Round to the nearest second.
        ((diff_ms + 500) / 1000) as u32
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn start_pause_resume() {
        let mut engine = TimerEngine::new(SessionType::Focus);
        assert_eq!(engine.state(), TimerState::Idle);

        assert!(engine.start(1500).is_some());
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.remaining_secs(), 1500);

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Paused);

        assert!(engine.resume().is_some());
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut engine = TimerEngine::new(SessionType::Focus);
        assert!(engine.start(60).is_some());
        assert!(engine.start(60).is_none());
    }

    #[test]
    fn pause_preserves_remaining_across_delay() {
        let mut engine = TimerEngine::new(SessionType::Focus);
        engine.start(600);
        engine.pause();
        let frozen = engine.remaining_secs();
        // Wall-clock time passing while paused must not alter remaining.
        sleep(Duration::from_millis(1200));
        assert_eq!(engine.remaining_secs(), frozen);
        engine.resume();
        engine.tick();
        assert!(engine.remaining_secs() >= frozen.saturating_sub(1));
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut engine = TimerEngine::new(SessionType::Break);
        engine.start(1);
        sleep(Duration::from_millis(1100));
        let first = engine.tick();
        assert!(matches!(first, Some(Event::TimerCompleted { .. })));
        assert_eq!(engine.state(), TimerState::Completed);
        assert_eq!(engine.remaining_secs(), 0);
        assert!(engine.tick().is_none());
        assert!(engine.tick().is_none());
    }

    #[test]
    fn remaining_never_negative() {
        let mut engine = TimerEngine::new(SessionType::Focus);
        engine.start(1);
        sleep(Duration::from_millis(1600));
        engine.tick();
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn rearm_requires_fresh_start() {
        let mut engine = TimerEngine::new(SessionType::Focus);
        engine.start(1);
        sleep(Duration::from_millis(1100));
        assert!(engine.tick().is_some());
        // A new run arms completion again.
        assert!(engine.start(1).is_some());
        assert_eq!(engine.state(), TimerState::Running);
        sleep(Duration::from_millis(1100));
        assert!(matches!(engine.tick(), Some(Event::TimerCompleted { .. })));
    }

    #[test]
    fn set_duration_only_while_idle() {
        let mut engine = TimerEngine::new(SessionType::Focus);
        engine.set_duration(300);
        assert_eq!(engine.remaining_secs(), 300);

        engine.start(300);
        engine.set_duration(900);
        assert_eq!(engine.duration_secs(), 300);
    }

    #[test]
    fn reset_restores_duration_and_clears_anchor() {
        let mut engine = TimerEngine::new(SessionType::Focus);
        engine.start(120);
        engine.reset();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 120);
        // Reset cancels the run; ticking does nothing.
        assert!(engine.tick().is_none());
    }
}
