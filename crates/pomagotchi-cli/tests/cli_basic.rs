//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and verify
//! outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomagotchi-cli"))
        .args(args)
        .env("POMAGOTCHI_DATA_DIR", data_dir)
        .env_remove("POMAGOTCHI_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args, "");
    assert_eq!(code, 0, "CLI command failed: {args:?}: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_status_on_fresh_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let state = run_json(dir.path(), &["status"]);
    assert_eq!(state["version"], "1.0.0");
    assert_eq!(state["creature"]["level"], 1);
    assert_eq!(state["creature"]["stage"], "egg");
    assert_eq!(state["timer"]["minutes"], 25);
    assert_eq!(state["timer"]["last_selected_minutes"], 25);
}

#[test]
fn test_progress_on_fresh_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let progress = run_json(dir.path(), &["progress"]);
    assert_eq!(progress["total_pomodoros_completed"], 0);
    assert_eq!(progress["current_streak"], 0);
}

#[test]
fn test_config_get_default() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.default_minutes"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_set_persists() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["config", "set", "notifications.undo_window_ms", "5000"],
        "",
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "notifications.undo_window_ms"], "");
    assert_eq!(stdout.trim(), "5000");
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "timer.nope"], "");
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "timer.default_seconds", "75"],
        "",
    );
    assert_ne!(code, 0);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_run_early_completion_records_progress() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["run"], "set 0 30\nstart\ndone\nquit\n");
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("Pomodoro completed early! Your creature gained 1 XP!"));

    let progress = run_json(dir.path(), &["progress"]);
    assert_eq!(progress["total_pomodoros_completed"], 1);
    assert_eq!(progress["total_xp_earned"], 1);

    let state = run_json(dir.path(), &["status"]);
    assert_eq!(state["creature"]["xp"], 1);
    assert_eq!(state["timer"]["last_selected_seconds"], 30);
}

#[test]
fn test_run_reset_data_and_undo() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["run"],
        "set 0 30\nstart\ndone\nreset-data\nundo\nundo\nquit\n",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("All data has been reset! (type 'undo' within 8s)"));
    assert!(stdout.contains("Data has been restored!"));
    assert!(stdout.contains("No backup available to restore"));

    let progress = run_json(dir.path(), &["progress"]);
    assert_eq!(progress["total_pomodoros_completed"], 1);
}

#[test]
fn test_run_quit_while_running_keeps_timer_paused() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["run", "--minutes", "5"], "start\nquit\n");
    assert_eq!(code, 0);

    let state = run_json(dir.path(), &["status"]);
    assert_eq!(state["timer"]["is_paused"], true);
    assert_eq!(state["timer"]["is_running"], false);
    assert_eq!(state["timer"]["last_selected_minutes"], 5);
}

#[test]
fn test_run_rejects_unknown_command_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["run"], "dance\nstatus\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("unknown command: dance"));
    assert!(stdout.contains("creature: level 1 egg (0/100 XP)"));
}
