//! Integration tests for the gymlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Entry logging and filtered listing
//! - Routine scheduling and expansion
//! - Snapshot export/import round trips
//! - CSV export
//! - Data persistence across invocations

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("gymlog"))
}

fn add_entry(data_dir: &Path, exercise: &str, weight: &str, reps: &str, week: &str) {
    cli()
        .args(["add", "--data-dir"])
        .arg(data_dir)
        .args(["--part", "upper", "--exercise", exercise])
        .args(["--weight", weight, "--reps", reps, "--week", week])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal workout and diet tracker"));
}

#[test]
fn test_empty_log_shows_intro() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Log is empty"));
}

#[test]
fn test_add_then_list() {
    let temp_dir = setup_test_dir();

    add_entry(temp_dir.path(), "Bench Press", "80", "8", "2");

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("80kg × 8"));
}

#[test]
fn test_list_defaults_to_latest_week() {
    let temp_dir = setup_test_dir();

    add_entry(temp_dir.path(), "Old Lift", "50", "10", "1");
    add_entry(temp_dir.path(), "New Lift", "60", "10", "2");

    // Default view shows only the latest week
    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 2"))
        .stdout(predicate::str::contains("New Lift"))
        .stdout(predicate::str::contains("Old Lift").not());

    // --all-weeks shows everything
    cli()
        .args(["list", "--all-weeks"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Old Lift"))
        .stdout(predicate::str::contains("New Lift"));
}

#[test]
fn test_entries_persist_across_invocations() {
    let temp_dir = setup_test_dir();

    add_entry(temp_dir.path(), "Bench Press", "80", "8", "1");

    // Slot file exists and is JSON
    let log_path = temp_dir.path().join("workout_log_v2.json");
    let contents = fs::read_to_string(&log_path).expect("Failed to read log slot");
    assert!(contents.contains("Bench Press"));

    // A second process sees the entry
    cli()
        .args(["list", "--all-weeks"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"));
}

#[test]
fn test_scheduled_routine_expansion_uses_history() {
    let temp_dir = setup_test_dir();

    add_entry(temp_dir.path(), "Bench Press", "80", "8", "3");

    cli()
        .args(["routine", "add", "Push Day", "--exercise", "upper:Bench Press"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    // Grab the routine id from the list output
    let output = cli()
        .args(["routine", "list"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to list routines");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let routine_id = stdout
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .expect("No routine id in output")
        .to_string();

    cli()
        .args(["schedule", "set", "monday", routine_id.as_str()])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    // 2026-03-09 is a Monday; expansion defaults to the 80x8 history
    cli()
        .args(["log-routine", "2026-03-09", "--week", "4"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("80kg × 8"));

    cli()
        .args(["day", "2026-03-09"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"));

    // No routine scheduled on Tuesday
    cli()
        .args(["log-routine", "2026-03-10", "--week", "4"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_edit_and_delete_entry() {
    let temp_dir = setup_test_dir();

    add_entry(temp_dir.path(), "Bench Press", "80", "8", "1");

    // Grab the entry id from the trailing [id] column of the list output
    let output = cli()
        .args(["list", "--all-weeks"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to list entries");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .lines()
        .find(|line| line.contains("Bench Press"))
        .and_then(|line| line.rsplit('[').next())
        .and_then(|tail| tail.strip_suffix(']'))
        .expect("No entry id in output")
        .to_string();

    cli()
        .args(["edit", &id, "--weight", "85"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["list", "--all-weeks"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("85kg × 8"));

    cli()
        .args(["delete", &id])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    // Second delete is a no-op
    cli()
        .args(["delete", &id])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Log is empty"));
}

#[test]
fn test_part_and_exercise_management() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["part", "add", "Arm Day"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("arm-day"));

    cli()
        .args(["exercise", "add", "arm-day", "Hammer Curl"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["exercise", "list", "arm-day"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hammer Curl"));

    // Same slug again is a validation error
    cli()
        .args(["part", "add", "arm   day"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();

    cli()
        .args(["part", "delete", "arm-day"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["exercise", "list", "arm-day"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hammer Curl").not());
}

#[test]
fn test_export_import_roundtrip() {
    let source_dir = setup_test_dir();
    let target_dir = setup_test_dir();
    let backup = source_dir.path().join("backup.json");

    add_entry(source_dir.path(), "Bench Press", "80", "8", "2");

    cli()
        .arg("export")
        .arg(&backup)
        .arg("--data-dir")
        .arg(source_dir.path())
        .assert()
        .success();

    // The backup is a JSON object with every slot present
    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&backup).unwrap()).unwrap();
    assert!(doc.get("log").and_then(|v| v.as_array()).is_some());
    assert!(doc.get("body_parts").is_some());
    assert!(doc.get("nutrition_goals").is_some());

    cli()
        .args(["import"])
        .arg(&backup)
        .arg("--yes")
        .arg("--data-dir")
        .arg(target_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Import complete"));

    cli()
        .args(["list", "--all-weeks"])
        .arg("--data-dir")
        .arg(target_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"));
}

#[test]
fn test_import_rejects_invalid_document() {
    let temp_dir = setup_test_dir();
    let bad = temp_dir.path().join("bad.json");
    fs::write(&bad, r#"{"log": "not a sequence"}"#).unwrap();

    cli()
        .args(["import"])
        .arg(&bad)
        .arg("--yes")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("out.csv");

    add_entry(temp_dir.path(), "Bench Press", "80", "8", "2");

    cli()
        .arg("export-csv")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let bytes = fs::read(&csv_path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "CSV missing UTF-8 BOM");

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains(r#""week","part","exercise""#));
    assert!(text.contains(r#""Bench Press""#));
    assert!(text.contains(r#""Upper Body""#));
}

#[test]
fn test_clear_requires_confirmation() {
    let temp_dir = setup_test_dir();

    add_entry(temp_dir.path(), "Bench Press", "80", "8", "1");

    // Declined prompt leaves the log untouched
    cli()
        .arg("clear")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("cancelled"));

    cli()
        .args(["clear", "--yes"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Log is empty"));
}

#[test]
fn test_diet_flow() {
    let temp_dir = setup_test_dir();

    // Log a seeded food twice, by name and by id
    cli()
        .args(["diet", "log", "lunch", "Chicken Breast", "2", "--date", "2026-03-09"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["diet", "log", "dinner", "food-2", "1.5", "--date", "2026-03-09"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    // 2 * 165 + 1.5 * 130 = 525 kcal
    cli()
        .args(["diet", "show", "2026-03-09"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("525"))
        .stdout(predicate::str::contains("Chicken Breast"))
        .stdout(predicate::str::contains("White Rice"));

    // Unknown food is a validation error
    cli()
        .args(["diet", "log", "lunch", "Unobtainium", "1", "--date", "2026-03-09"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_goals_set_and_show() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["goals", "set", "--calories", "1850", "--protein", "140"])
        .args(["--carbs", "170", "--fat", "60"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["goals", "show"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1850"));
}
