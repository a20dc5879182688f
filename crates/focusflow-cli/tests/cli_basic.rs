//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. All commands
//! run against the dev data directory (FOCUSFLOW_ENV=dev).

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focusflow-cli", "--quiet", "--"])
        .args(args)
        .env("FOCUSFLOW_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_stats_show() {
    let (stdout, _, code) = run_cli(&["stats", "show"]);
    assert_eq!(code, 0, "stats show failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("stats is JSON");
    assert!(parsed.get("completedSessions").is_some());
}

#[test]
fn test_history_list() {
    let (stdout, _, code) = run_cli(&["history", "list"]);
    assert_eq!(code, 0, "history list failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_history_clear() {
    let (stdout, _, code) = run_cli(&["history", "clear"]);
    assert_eq!(code, 0, "history clear failed");
    assert!(stdout.contains("history cleared"));
}

#[test]
fn test_config_show() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("base_url"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let (_, stderr, code) = run_cli(&["config", "set", "nope.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error"));
}

#[test]
fn test_session_run_rejects_bad_duration() {
    let (_, stderr, code) = run_cli(&["session", "run", "--focus", "ten minutes"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("invalid focus duration"));
}
