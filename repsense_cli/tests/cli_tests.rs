//! Integration tests for the repsense binary.
//!
//! These tests replay small recordings end to end:
//! - Catalog listing and argument validation
//! - Rep counting and plank timing through the frame loop
//! - Failed detections and time limits

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const RIGHT_SHOULDER: usize = 12;
const RIGHT_ELBOW: usize = 14;
const RIGHT_WRIST: usize = 16;
const RIGHT_HIP: usize = 24;
const RIGHT_ANKLE: usize = 28;
const NOSE: usize = 0;

/// Helper to create an isolated config directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI with the user config directory pointed at `dir`
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repsense"));
    cmd.env("XDG_CONFIG_HOME", dir.path());
    cmd
}

/// One recording line with only the listed landmarks present
fn line(t_ms: u64, points: &[(usize, (f64, f64))]) -> String {
    let mut landmarks = vec![Value::Null; 33];
    for &(index, (x, y)) in points {
        landmarks[index] = json!({ "x": x, "y": y });
    }
    json!({ "t_ms": t_ms, "landmarks": landmarks }).to_string()
}

/// Side-on push-up, straight body; `bottom` bends the elbow to ~63 degrees
fn pushup(t_ms: u64, bottom: bool) -> String {
    let wrist = if bottom { (0.4, 0.55) } else { (0.3, 0.7) };
    line(
        t_ms,
        &[
            (RIGHT_SHOULDER, (0.3, 0.5)),
            (RIGHT_ELBOW, (0.3, 0.6)),
            (RIGHT_WRIST, wrist),
            (RIGHT_HIP, (0.5, 0.5)),
            (RIGHT_ANKLE, (0.7, 0.5)),
        ],
    )
}

fn write_recording(dir: &TempDir, lines: &[String]) -> PathBuf {
    let path = dir.path().join("recording.jsonl");
    fs::write(&path, lines.join("\n") + "\n").expect("Failed to write recording");
    path
}

fn one_pushup() -> Vec<String> {
    vec![pushup(0, false), pushup(300, true), pushup(600, false)]
}

#[test]
fn test_cli_help() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pose-based exercise rep counter"));
}

#[test]
fn test_list_shows_catalog() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pushups"))
        .stdout(predicate::str::contains("Jumping Jacks (30s)"))
        .stdout(predicate::str::contains("Forearm Plank Hold"));
}

#[test]
fn test_pushup_replay_counts_rep() {
    let dir = setup_test_dir();
    let recording = write_recording(&dir, &one_pushup());

    cli(&dir)
        .args(["run", "--exercise", "pushups", "--input"])
        .arg(&recording)
        .assert()
        .success()
        .stdout(predicate::str::contains("Push-ups (60s)"))
        .stdout(predicate::str::contains("Result: 1 reps"))
        .stdout(predicate::str::contains("Frames evaluated: 3"));
}

#[test]
fn test_replay_from_stdin() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["run", "--exercise", "push-ups", "--json"])
        .write_stdin(one_pushup().join("\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exercise\": \"pushups\""))
        .stdout(predicate::str::contains("\"value\": 1"));
}

#[test]
fn test_follow_prints_each_snapshot() {
    let dir = setup_test_dir();
    let recording = write_recording(&dir, &one_pushup());

    let output = cli(&dir)
        .args(["run", "--exercise", "pushups", "--follow", "--input"])
        .arg(&recording)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let snapshots: Vec<&str> = stdout
        .lines()
        .filter(|l| l.trim_end().ends_with("reps") && !l.contains("Result"))
        .map(str::trim)
        .collect();
    assert_eq!(snapshots, vec!["0 reps", "0 reps", "1 reps"]);
}

#[test]
fn test_overlay_output() {
    let dir = setup_test_dir();
    let recording = write_recording(&dir, &one_pushup());

    cli(&dir)
        .args(["run", "--exercise", "pushups", "--overlay", "--input"])
        .arg(&recording)
        .assert()
        .success()
        .stdout(predicate::str::contains("[framing: Good]"));
}

#[test]
fn test_plank_json_report() {
    let dir = setup_test_dir();
    let frames: Vec<String> = (0..=30)
        .map(|i| {
            line(
                i * 100,
                &[
                    (RIGHT_SHOULDER, (0.3, 0.5)),
                    (RIGHT_HIP, (0.5, 0.5)),
                    (RIGHT_ANKLE, (0.7, 0.5)),
                ],
            )
        })
        .collect();
    let recording = write_recording(&dir, &frames);

    let output = cli(&dir)
        .args(["run", "--exercise", "plank", "--json", "--input"])
        .arg(&recording)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&output).expect("Report is not JSON");
    assert_eq!(report["exercise"], "plank");
    assert_eq!(report["metric"]["unit"], "seconds");
    // Gate passes at 0.4 s, hold runs to 3.0 s
    assert_eq!(report["metric"]["value"], 2);
    assert_eq!(report["frames_evaluated"], 31);
    assert!(report["session_id"].is_string());
}

#[test]
fn test_failed_detections_are_skipped() {
    let dir = setup_test_dir();
    let mut lines = one_pushup();
    lines.insert(1, json!({ "t_ms": 150, "error": "detector timeout" }).to_string());
    lines.insert(2, "not json".to_string());
    lines.insert(3, json!({ "t_ms": 200, "landmarks": null }).to_string());
    let recording = write_recording(&dir, &lines);

    cli(&dir)
        .args(["run", "--exercise", "pushups", "--json", "--input"])
        .arg(&recording)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": 1"))
        .stdout(predicate::str::contains("\"frames_evaluated\": 3"))
        .stdout(predicate::str::contains("\"source_failures\": 2"));
}

#[test]
fn test_time_limit_stops_replay() {
    let dir = setup_test_dir();
    let frames: Vec<String> = [0, 10_000, 29_000, 30_000, 45_000]
        .iter()
        .map(|&t| line(t, &[(NOSE, (0.5, 0.2))]))
        .collect();
    let recording = write_recording(&dir, &frames);

    cli(&dir)
        .args(["run", "--exercise", "jumpingjacks", "--json", "--input"])
        .arg(&recording)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"frames_evaluated\": 3"));
}

#[test]
fn test_time_limit_disabled_by_config() {
    let dir = setup_test_dir();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[session]\nenforce_time_limit = false\n").unwrap();
    let frames: Vec<String> = [0, 10_000, 29_000, 30_000, 45_000]
        .iter()
        .map(|&t| line(t, &[(NOSE, (0.5, 0.2))]))
        .collect();
    let recording = write_recording(&dir, &frames);

    cli(&dir)
        .args(["run", "--exercise", "jumpingjacks", "--json", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&recording)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"frames_evaluated\": 5"));
}

#[test]
fn test_unknown_exercise_fails_before_reading() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["run", "--exercise", "sprint100m", "--input"])
        .arg(dir.path().join("missing.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown exercise"));
}

#[test]
fn test_invalid_config_rejected() {
    let dir = setup_test_dir();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[framing]\nthrottle_ms = 0\n").unwrap();

    cli(&dir)
        .args(["run", "--exercise", "squats", "--config"])
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure();
}
