//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points HOME at its own temporary directory so config and database start
//! fresh.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(home, args, "")
}

fn run_cli_with_input(home: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "pomostudy-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("POMOSTUDY_ENV")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).expect("Failed to write stdin");
    }
    let output = child.wait_with_output().expect("Failed to wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_config_defaults() {
    let home = tempfile::tempdir().unwrap();
    let config = run_json(home.path(), &["config", "list"]);
    assert_eq!(config["timer"]["tick_interval_ms"], 200);
    assert_eq!(config["active_profile"], "default");
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "timer.duration_unit", "seconds"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timer.duration_unit"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "seconds");
}

#[test]
fn test_config_rejects_invalid_value() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timer.tick_interval_ms", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_profile_save_show_delete() {
    let home = tempfile::tempdir().unwrap();
    let saved = run_json(
        home.path(),
        &["profile", "save", "exam", "--studying", "50", "--cycles", "3"],
    );
    assert_eq!(saved["duration_studying"], 50);
    assert_eq!(saved["duration_short_break"], 5);

    let shown = run_json(home.path(), &["profile", "show", "exam"]);
    assert_eq!(shown["cycles_until_long_break"], 3);

    let (stdout, _, code) = run_cli(home.path(), &["profile", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("default [ACTIVE]"));
    assert!(stdout.contains("exam"));

    let (_, _, code) = run_cli(home.path(), &["profile", "delete", "exam"]);
    assert_eq!(code, 0);
    let (_, _, code) = run_cli(home.path(), &["profile", "show", "exam"]);
    assert_ne!(code, 0);
}

#[test]
fn test_profile_rejects_zero_duration() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["profile", "save", "broken", "--short-break", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_default_profile_cannot_be_deleted() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["profile", "delete", "default"]);
    assert_ne!(code, 0);
}

#[test]
fn test_timer_next() {
    let home = tempfile::tempdir().unwrap();
    let next = run_json(home.path(), &["timer", "next", "--cycles", "4"]);
    assert_eq!(next, "long_break");
    let next = run_json(home.path(), &["timer", "next", "--cycles", "1"]);
    assert_eq!(next, "short_break");
    let next = run_json(home.path(), &["timer", "next", "--current", "short-break"]);
    assert_eq!(next, "studying");
}

#[test]
fn test_timer_run_logs_spans() {
    let home = tempfile::tempdir().unwrap();
    let today = chrono::Utc::now().date_naive().to_string();
    let (stdout, stderr, code) =
        run_cli_with_input(home.path(), &["timer", "run", "--seconds"], "t\nt\nq\n");
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout.contains("commands:"));

    let history = run_json(home.path(), &["history", "--from", &today]);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["is_paused"], true);
    assert_eq!(entries[1]["is_paused"], false);
}

#[test]
fn test_timer_run_next_period_logs_study_span() {
    let home = tempfile::tempdir().unwrap();
    let today = chrono::Utc::now().date_naive().to_string();
    let (stdout, stderr, code) =
        run_cli_with_input(home.path(), &["timer", "run", "--seconds"], "n\nq\n");
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout.contains("n = next period"));

    let history = run_json(home.path(), &["history", "--from", &today]);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["is_studying"], true);
    assert_eq!(entries[0]["is_paused"], true);
}

#[test]
fn test_timer_run_switches_profile() {
    let home = tempfile::tempdir().unwrap();
    run_json(home.path(), &["profile", "save", "exam", "--studying", "50"]);

    let (stdout, stderr, code) = run_cli_with_input(
        home.path(),
        &["timer", "run", "--seconds"],
        "u exam\nu missing\nq\n",
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout.contains("profile: default"));
    assert!(stdout.contains("profile: exam"));
    assert!(stdout.contains("unknown profile: missing"));
}

#[test]
fn test_stats_week_has_seven_days() {
    let home = tempfile::tempdir().unwrap();
    let week = run_json(home.path(), &["stats", "week"]);
    assert_eq!(week.as_array().unwrap().len(), 7);
}

#[test]
fn test_stats_days_rejects_reversed_range() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        home.path(),
        &["stats", "days", "--from", "2024-03-10", "--to", "2024-03-01"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_settings_theme_toggle() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_json(home.path(), &["settings", "theme"]), "light");
    assert_eq!(run_json(home.path(), &["settings", "theme", "toggle"]), "dark");
    assert_eq!(run_json(home.path(), &["settings", "theme"]), "dark");
}
