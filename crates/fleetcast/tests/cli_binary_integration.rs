use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn fleetcast_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fleetcast"))
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_artifact.json")
}

fn run_fleetcast(args: &[&str]) -> Output {
    Command::new(fleetcast_bin())
        .args(args)
        .env_remove("FLEETCAST_ARTIFACT")
        .env_remove("FLEETCAST_CONFIG")
        .env_remove("FLEETCAST_LOG")
        .output()
        .expect("run fleetcast binary")
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn log_file_receives_artifact_loaded_event() {
    let dir = tempdir().expect("tempdir");
    let log = dir.path().join("fleetcast.log");
    let artifact = fixture();

    let output = run_fleetcast(&[
        "--artifact",
        artifact.to_str().expect("utf-8 path"),
        "--log-level",
        "info",
        "--log-file",
        log.to_str().expect("utf-8 path"),
        "inspect",
        "--json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));

    let logged = fs::read_to_string(&log).expect("read log file");
    assert!(logged.contains("artifact loaded"), "log file: {logged:?}");
    assert!(logged.contains("fleetcast.artifact"));
    // Events went to the file, not stderr.
    assert!(!stderr_text(&output).contains("artifact loaded"));
}

#[test]
fn json_log_lines_parse() {
    let dir = tempdir().expect("tempdir");
    let log = dir.path().join("fleetcast.jsonl");
    let artifact = fixture();

    let output = run_fleetcast(&[
        "--artifact",
        artifact.to_str().expect("utf-8 path"),
        "--log-level",
        "info",
        "--log-json",
        "--log-file",
        log.to_str().expect("utf-8 path"),
        "options",
        "--json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));

    let logged = fs::read_to_string(&log).expect("read log file");
    let loaded = logged
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).expect("json log line"))
        .find(|event| event["fields"]["message"] == "artifact loaded")
        .expect("artifact loaded event");
    assert_eq!(loaded["level"], "INFO");
    assert_eq!(loaded["fields"]["models"], 12);
}

#[test]
fn unknown_model_exits_two_with_message() {
    let artifact = fixture();
    let output = run_fleetcast(&[
        "--artifact",
        artifact.to_str().expect("utf-8 path"),
        "forecast",
        "--model",
        "Z9",
        "--region",
        "Europe",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_text(&output).contains("unknown model: Z9"));
    assert!(stdout_text(&output).is_empty());
}

#[test]
fn forecast_prints_card_to_stdout() {
    let artifact = fixture();
    let output = run_fleetcast(&[
        "--artifact",
        artifact.to_str().expect("utf-8 path"),
        "forecast",
        "--model",
        "X5",
        "--region",
        "Europe",
        "--year",
        "2027",
        "--engine",
        "3.0",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    let text = stdout_text(&output);
    assert!(text.contains("6,155 Units"));
    assert!(text.contains("$291,881,040"));
}
