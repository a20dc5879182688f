use std::time::Duration;

use clap::Subcommand;
use focusflow_core::timer::{format_mmss, parse_mmss};
use focusflow_core::{BackendClient, Config, Database, Event, Phase, SessionController};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a full focus/break cycle
    Run {
        /// Optional session title, shown in history
        #[arg(long)]
        title: Option<String>,
        /// Focus duration as MM:SS or minutes (default from config)
        #[arg(long)]
        focus: Option<String>,
        /// Break duration as MM:SS or minutes (default from config)
        #[arg(long = "break")]
        break_duration: Option<String>,
    },
}

fn duration_flag(flag: Option<String>, fallback: u32, name: &str) -> Result<u32, String> {
    match flag {
        Some(raw) => {
            parse_mmss(&raw).ok_or_else(|| format!("invalid {name} duration '{raw}' (use MM:SS)"))
        }
        None => Ok(fallback),
    }
}

pub async fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run {
            title,
            focus,
            break_duration,
        } => run_cycle(title, focus, break_duration).await,
    }
}

/// Drives the three cooperative cadences of a session: the timer tick, the
/// focus-phase posture poll, and the break-phase rep poll. Each poller is a
/// phase-guarded no-op in the controller, so a single select loop is enough.
async fn run_cycle(
    title: Option<String>,
    focus: Option<String>,
    break_duration: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load_or_default();
    let focus_secs = duration_flag(focus, cfg.session.focus_seconds, "focus")?;
    let break_secs = duration_flag(break_duration, cfg.session.break_seconds, "break")?;

    let client = BackendClient::new(cfg.backend.base_url.parse()?);
    let db = Database::open()?;
    let mut controller = SessionController::new(client, db, cfg.session.rep_goal)?;

    let outcome = controller.start_focus(title, focus_secs, break_secs).await?;
    if !outcome.backend_online {
        eprintln!("notice: backend unreachable, timer running locally");
    }
    println!(
        "focus session started: {} focus, {} break",
        format_mmss(focus_secs),
        format_mmss(break_secs)
    );

    let mut tick = tokio::time::interval(Duration::from_millis(cfg.polling.tick_interval_ms));
    let mut status = tokio::time::interval(Duration::from_millis(cfg.polling.status_interval_ms));
    let mut reps = tokio::time::interval(Duration::from_millis(cfg.polling.rep_interval_ms));

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Some(event) = controller.tick().await? {
                    match event {
                        Event::FocusFinished { posture_average, break_param, .. } => {
                            println!("focus complete! posture average {posture_average}%");
                            println!("active break started ({break_param})");
                        }
                        Event::BreakFinished { ref record, .. } => {
                            println!("{}", serde_json::to_string_pretty(record)?);
                            let stats = controller.return_to_setup()?;
                            println!(
                                "break complete: {}/{} reps. completed sessions: {}",
                                record.reps, record.goal, stats.completed_sessions
                            );
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
            _ = status.tick() => {
                controller.poll_focus().await;
                if controller.phase() == Phase::FocusActive {
                    println!(
                        "{} remaining | posture avg {}%",
                        format_mmss(controller.remaining_secs()),
                        controller.stats().average_posture
                    );
                }
            }
            _ = reps.tick() => {
                controller.poll_break().await;
                if controller.phase() == Phase::BreakActive {
                    println!(
                        "{} remaining | {} reps",
                        format_mmss(controller.remaining_secs()),
                        controller.live_reps()
                    );
                }
            }
        }
    }
}
