//! Focus/break session orchestration.
//!
//! The controller is a tick-driven state machine over three phases:
//!
//! ```text
//! Setup -> FocusActive -> BreakActive -> Setup
//! ```
//!
//! It owns one timer engine at a time (a fresh engine per interval), the
//! posture aggregator, the durable store and the backend client. The caller
//! drives it with three cooperative cadences: `tick()` (0.5-1s), `poll_focus()`
//! (1s) and `poll_break()` (2s). Poll methods are phase-guarded no-ops, so a
//! result arriving after the owning phase has been left is discarded rather
//! than applied.
//!
//! Backend calls are best-effort: a failed start/stop is logged and surfaced
//! once as a non-fatal notice, a failed poll just leaves data stale, and a
//! failed results fetch falls back to the live rep count. Only duration
//! validation can block a transition.

use chrono::Utc;

use super::SessionConfig;
use crate::api::{BackendClient, ExerciseResult};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::metrics::MetricAggregator;
use crate::storage::{keys, Database, HistoryStore, SessionRecord, Stats, StatsStore};
use crate::timer::{format_mmss, parse_mmss, SessionType, TimerEngine};

/// Default break when the navigation parameter is absent or unparseable.
const DEFAULT_BREAK_SECS: u32 = 10 * 60;

/// Fallback exercise type when the backend cannot report results.
const FALLBACK_EXERCISE: &str = "squats";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    FocusActive,
    BreakActive,
}

/// What `start_focus` accomplished besides the local transition.
#[derive(Debug, Clone, Copy)]
pub struct StartOutcome {
    /// False when the backend start call failed; the local timer runs anyway.
    pub backend_online: bool,
}

pub struct SessionController {
    client: BackendClient,
    db: Database,
    timer: TimerEngine,
    aggregator: MetricAggregator,
    phase: Phase,
    config: Option<SessionConfig>,
    stats: Stats,
    live_reps: u32,
    rep_goal: u32,
}

impl SessionController {
    /// Create a controller in `Setup`.
    ///
    /// Entering setup consumes any pending completed-session increment left
    /// by a previous lifecycle, exactly once.
    pub fn new(client: BackendClient, db: Database, rep_goal: u32) -> Result<Self> {
        let stats_store = StatsStore::new(&db);
        let mut stats = stats_store.load()?;
        let queued = stats_store.consume_pending_increment()?;
        if queued > 0 {
            stats.completed_sessions += queued;
            stats_store.save(&stats)?;
        }
        Ok(Self {
            client,
            db,
            timer: TimerEngine::new(SessionType::Focus),
            aggregator: MetricAggregator::new(),
            phase: Phase::Setup,
            config: None,
            stats,
            live_reps: 0,
            rep_goal,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    pub fn live_reps(&self) -> u32 {
        self.live_reps
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn timer_snapshot(&self) -> Event {
        self.timer.snapshot()
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// `Setup -> FocusActive`.
    ///
    /// Validates both durations, persists the session config, clears the
    /// prior aggregate, starts the local timer, then asks the backend to
    /// start tracking. The backend call is best-effort; its failure is
    /// reported in the outcome without blocking the transition.
    pub async fn start_focus(
        &mut self,
        title: Option<String>,
        focus_seconds: u32,
        break_seconds: u32,
    ) -> Result<StartOutcome> {
        if focus_seconds < 1 || break_seconds < 1 {
            return Err(CoreError::InvalidDuration(
                "durations must be greater than zero".to_string(),
            ));
        }
        // A new start supersedes whatever was active.
        if self.phase != Phase::Setup {
            self.leave_active_phase();
        }

        let config = SessionConfig {
            title: title.filter(|t| !t.trim().is_empty()),
            focus_seconds,
            break_seconds,
            started_at: Utc::now(),
        };
        self.db.put_json(keys::CURRENT_SESSION_CONFIG, &config)?;
        self.db.kv_delete(keys::LAST_POSTURE_AVERAGE)?;
        self.config = Some(config);

        self.aggregator.reset();
        self.stats.average_posture = 0;
        StatsStore::new(&self.db).save(&self.stats)?;

        self.timer = TimerEngine::new(SessionType::Focus);
        self.timer.start(focus_seconds);
        self.live_reps = 0;
        self.phase = Phase::FocusActive;

        let backend_online = match self.client.start_session(focus_seconds, break_seconds).await {
            Ok(ack) => {
                log::info!("backend session {}", ack.status);
                true
            }
            Err(e) => {
                log::warn!("backend start failed, continuing locally: {e}");
                false
            }
        };
        Ok(StartOutcome { backend_online })
    }

    /// Focus-phase status poll (1s cadence). Failures leave data stale.
    pub async fn poll_focus(&mut self) {
        if self.phase != Phase::FocusActive {
            return;
        }
        match self.client.session_status().await {
            Ok(status) => {
                if let Some(score) = status.posture_score {
                    self.stats.average_posture = self.aggregator.ingest(score);
                }
            }
            Err(e) => log::debug!("status poll failed: {e}"),
        }
    }

    /// Break-phase rep poll (2s cadence). Reps only; no posture.
    pub async fn poll_break(&mut self) {
        if self.phase != Phase::BreakActive {
            return;
        }
        match self.client.session_status().await {
            Ok(status) => self.live_reps = status.reps,
            Err(e) => log::debug!("rep poll failed: {e}"),
        }
    }

    /// Drive the active timer. Returns the transition event when an interval
    /// completes: `FocusFinished` when the focus countdown ends (the break is
    /// entered immediately), `BreakFinished` when the break ends (one record
    /// has been appended to history).
    pub async fn tick(&mut self) -> Result<Option<Event>> {
        let completed = matches!(self.timer.tick(), Some(Event::TimerCompleted { .. }));
        if !completed {
            return Ok(None);
        }
        match self.phase {
            Phase::FocusActive => self.finish_focus().await.map(Some),
            Phase::BreakActive => self.finish_break().await.map(Some),
            Phase::Setup => Ok(None),
        }
    }

    /// Enter the break with a `MM:SS` duration parameter, per the navigation
    /// contract. Absent or unparseable falls back to 10:00.
    pub fn enter_break(&mut self, duration_param: Option<&str>) {
        let secs = duration_param
            .and_then(parse_mmss)
            .unwrap_or(DEFAULT_BREAK_SECS);
        self.timer = TimerEngine::new(SessionType::Break);
        self.timer.start(secs);
        self.live_reps = 0;
        self.phase = Phase::BreakActive;
    }

    /// `BreakActive -> Setup` (user action). Consumes the pending increment
    /// queued at focus completion and applies it exactly once.
    pub fn return_to_setup(&mut self) -> Result<Stats> {
        let stats_store = StatsStore::new(&self.db);
        let queued = stats_store.consume_pending_increment()?;
        if queued > 0 {
            self.stats.completed_sessions += queued;
            stats_store.save(&self.stats)?;
        }
        self.leave_active_phase();
        Ok(self.stats)
    }

    /// Abandon the current session and go back to setup without recording
    /// anything. Stops the backend best-effort.
    pub async fn reconfigure(&mut self) {
        if let Err(e) = self.client.stop_session().await {
            log::warn!("backend stop failed: {e}");
        }
        self.leave_active_phase();
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// `FocusActive -> BreakActive`: stop the backend, finalize the posture
    /// average, queue the completed-session increment, hand the break
    /// duration off as a `MM:SS` parameter.
    async fn finish_focus(&mut self) -> Result<Event> {
        if let Err(e) = self.client.stop_session().await {
            log::warn!("backend stop failed: {e}");
        }

        // No samples this session: keep the previously displayed average.
        let average = if self.aggregator.sample_count() > 0 {
            self.aggregator.average()
        } else {
            self.stats.average_posture
        };
        self.db.put_json(keys::LAST_POSTURE_AVERAGE, &average)?;
        self.aggregator.reset();

        StatsStore::new(&self.db).set_pending_increment(1)?;

        let break_seconds = self
            .config
            .as_ref()
            .map(|c| c.break_seconds)
            .unwrap_or(DEFAULT_BREAK_SECS);
        let break_param = format_mmss(break_seconds);
        self.enter_break(Some(&break_param));

        Ok(Event::FocusFinished {
            posture_average: average,
            break_param,
            at: Utc::now(),
        })
    }

    /// `BreakActive` completion: fetch results (or synthesize a fallback from
    /// live reps) and append exactly one record to history.
    async fn finish_break(&mut self) -> Result<Event> {
        let result = match self.client.exercise_results().await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("results fetch failed, synthesizing from live reps: {e}");
                ExerciseResult {
                    exercise_type: FALLBACK_EXERCISE.to_string(),
                    count: self.live_reps,
                    goal: self.rep_goal,
                    duration_seconds: self.timer.duration_secs(),
                    completed: self.live_reps >= self.rep_goal,
                }
            }
        };

        let config = match self.config.clone() {
            Some(c) => c,
            // Fresh lifecycle: recover the config persisted at session start.
            None => self
                .db
                .get_json::<SessionConfig>(keys::CURRENT_SESSION_CONFIG)?
                .unwrap_or(SessionConfig {
                    title: None,
                    focus_seconds: 0,
                    break_seconds: self.timer.duration_secs(),
                    started_at: Utc::now(),
                }),
        };
        let posture_average = self.db.get_json::<u8>(keys::LAST_POSTURE_AVERAGE)?;

        let record = SessionRecord {
            title: config.title,
            focus_seconds: config.focus_seconds,
            break_seconds: config.break_seconds,
            started_at: config.started_at,
            exercise_type: result.exercise_type,
            reps: result.count,
            goal: result.goal,
            duration_seconds: result.duration_seconds,
            completed: result.completed,
            posture_average,
            timestamp: Utc::now(),
        };
        HistoryStore::new(&self.db).append(&record)?;

        Ok(Event::BreakFinished {
            record,
            at: Utc::now(),
        })
    }

    fn leave_active_phase(&mut self) {
        self.timer = TimerEngine::new(SessionType::Focus);
        self.aggregator.reset();
        self.live_reps = 0;
        self.phase = Phase::Setup;
    }
}
