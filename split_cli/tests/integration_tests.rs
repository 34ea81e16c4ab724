//! Integration tests for the splitsched binary.
//!
//! These tests verify end-to-end behavior including:
//! - Month generation with and without existing classes
//! - Run log and suggested-state persistence
//! - Dry-run semantics
//! - Output formats

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("splitsched"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gym split month-schedule generator"));
}

#[test]
fn test_generate_month_with_no_classes() {
    let temp_dir = setup_test_dir();

    // September 2026 has 30 days; with no classes every day is a full workout
    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKOUT SCHEDULE 2026-09"))
        .stdout(predicate::str::contains("Full workouts: 30"))
        .stdout(predicate::str::contains("Cardio sessions: 0"))
        .stdout(predicate::str::contains("Total events: 30"));
}

#[test]
fn test_text_banner_lines_are_closed() {
    let temp_dir = setup_test_dir();

    let output = cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("stdout not UTF-8");
    let banner: Vec<&str> = stdout.lines().take(3).collect();
    assert_eq!(banner.len(), 3);
    assert!(banner[1].ends_with('│'), "unclosed line: {:?}", banner[1]);

    let widths: Vec<usize> = banner.iter().map(|l| l.chars().count()).collect();
    assert_eq!(widths[0], widths[1], "banner lines: {:?}", banner);
    assert_eq!(widths[1], widths[2], "banner lines: {:?}", banner);
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success();

    assert!(!temp_dir.path().join("runs.jsonl").exists());
    assert!(!temp_dir.path().join("suggested_state.json").exists());
}

#[test]
fn test_live_run_records_run_and_suggested_state() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let log_content =
        fs::read_to_string(temp_dir.path().join("runs.jsonl")).expect("Failed to read run log");
    assert!(log_content.contains("\"month\":\"2026-09\""));

    let suggested: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("suggested_state.json"))
            .expect("Failed to read suggested state"),
    )
    .expect("Suggested state is not valid JSON");

    // Fresh state plus 30 full workouts; the deload boundary jumps past it
    assert_eq!(suggested["total_full_workouts"], 30);
    assert_eq!(suggested["next_deload_at"], 32);
}

#[test]
fn test_runs_subcommand_lists_recorded_runs() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("runs")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-09"))
        .stdout(predicate::str::contains("30 events"));
}

#[test]
fn test_runs_subcommand_with_no_history() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("runs")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No runs recorded yet."));
}

#[test]
fn test_invalid_month_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-13")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("2026-13"));

    cli()
        .arg("generate")
        .arg("--month")
        .arg("september")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_csv_format_output() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "date,start,kind,template_id,title,duration_minutes",
        ))
        // 2026-09-01 is a Tuesday with no class: evening full workout
        .stdout(predicate::str::contains(
            "2026-09-01,20:00,full_workout,upper_push,Upper Push,85",
        ));
}

#[test]
fn test_json_format_output() {
    let temp_dir = setup_test_dir();

    let output = cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value =
        serde_json::from_slice(&output).expect("JSON output did not parse");

    assert_eq!(value["month"], "2026-09");
    assert_eq!(value["timezone"], "America/New_York");
    assert_eq!(value["events"].as_array().unwrap().len(), 30);
    assert!(value["delete_markers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m == "Cardio Session"));
    assert_eq!(value["summary"]["full_workouts"], 30);
}

#[test]
fn test_class_day_becomes_post_class_cardio() {
    let temp_dir = setup_test_dir();
    let events_path = temp_dir.path().join("events.json");

    // A studio class on Tuesday 2026-09-01 ending at 18:30 local time
    let events = r#"[
        {
            "title": "Solidcore Signature50",
            "start": "2026-09-01T17:40:00-04:00",
            "end": "2026-09-01T18:30:00-04:00"
        }
    ]"#;
    fs::write(&events_path, events).expect("Failed to write events fixture");

    let output = cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--events")
        .arg(&events_path)
        .arg("--dry-run")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value =
        serde_json::from_slice(&output).expect("JSON output did not parse");

    let first_day = value["events"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["date"] == "2026-09-01")
        .expect("No event on 2026-09-01");

    // Class end 18:30 + 30 minute buffer
    assert_eq!(first_day["kind"], "cardio_only");
    assert_eq!(first_day["start"], "2026-09-01T19:00:00");
    assert_eq!(first_day["duration_minutes"], 25);
    assert_eq!(first_day["title"], "Cardio Session");

    assert_eq!(value["summary"]["full_workouts"], 29);
    assert_eq!(value["summary"]["cardio_sessions"], 1);
    assert_eq!(value["summary"]["classes_detected"], 1);
}

#[test]
fn test_seeded_rotation_from_state_file() {
    let temp_dir = setup_test_dir();

    // Two full workouts already completed: the month resumes at upper_pull
    let state = r#"{
        "per_template_count": {"upper_push": 1, "lower_hamstring_posterior": 1},
        "total_full_workouts": 2,
        "next_deload_at": 8,
        "exercise_state": {}
    }"#;
    fs::write(temp_dir.path().join("progression_state.json"), state)
        .expect("Failed to write state fixture");

    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2026-09-01,20:00,full_workout,upper_pull,Upper Pull,85",
        ));
}

#[test]
fn test_output_file_export() {
    let temp_dir = setup_test_dir();
    let out_path = temp_dir.path().join("schedule.csv");

    cli()
        .arg("generate")
        .arg("--month")
        .arg("2026-09")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--dry-run")
        .arg("--format")
        .arg("csv")
        .arg("--out")
        .arg(&out_path)
        .assert()
        .success();

    let content = fs::read_to_string(&out_path).expect("Failed to read exported file");
    assert!(content.starts_with("date,start,"));
    assert_eq!(content.lines().count(), 31); // header plus one row per day
}
