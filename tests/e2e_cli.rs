//! CLI end-to-end tests
//!
//! Tests for the yansa command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the yansa binary
#[allow(deprecated)]
fn yansa_cmd() -> Command {
    let mut cmd = Command::cargo_bin("yansa").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn bundled_rules_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("crates/yansa-parser/dictionaries")
}

fn copy_rules(to: &Path) {
    for entry in fs::read_dir(bundled_rules_dir()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), to.join(entry.file_name())).unwrap();
    }
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = yansa_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = yansa_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("yansa"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = yansa_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("yansa"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = yansa_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_parse_help() {
    let mut cmd = yansa_cmd();
    cmd.args(["parse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parse one or more filenames"));
}

#[test]
fn test_cli_parse_requires_filename() {
    let mut cmd = yansa_cmd();
    cmd.arg("parse").assert().failure();
}

#[test]
fn test_cli_parse_summary() {
    let mut cmd = yansa_cmd();
    cmd.args(["parse", "/media/incoming/Active Duty - Scene Title.mp4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pattern: {studio} - {title}"))
        .stdout(predicate::str::contains("Studio: Active Duty"))
        .stdout(predicate::str::contains("Title: Scene Title"));
}

#[test]
fn test_cli_parse_json_lines() {
    let mut cmd = yansa_cmd();
    let assert = cmd
        .args([
            "parse",
            "--json",
            "Active Duty - Scene Title.mp4",
            "John Smith & Jane Doe",
        ])
        .assert()
        .success();

    let lines = json_lines(&assert.get_output().stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["studio"], "Active Duty");
    assert_eq!(lines[0]["pattern"], "{studio} - {title}");
    assert_eq!(lines[1]["pattern"], "{performers}");
    assert_eq!(lines[1]["tokens"][0]["type"], "performers");
}

#[test]
fn test_cli_parse_existing_studio() {
    let mut cmd = yansa_cmd();
    let assert = cmd
        .args(["parse", "--json", "--studio", "Scary Fuckers", "8492 02 Title Here"])
        .assert()
        .success();

    let lines = json_lines(&assert.get_output().stdout);
    assert_eq!(lines[0]["studio"], "Scary Fuckers");
    assert_eq!(lines[0]["studio_code"], "0849202");
}

#[test]
fn test_cli_parse_trace() {
    let mut cmd = yansa_cmd();
    cmd.args(["parse", "--trace", "Active Duty - Scene Title"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[tokenize] {token0} - {token1}"))
        .stdout(predicate::str::contains("[studios] {studio} - {token0}"))
        .stdout(predicate::str::contains("[final] {studio} - {title}"));
}

#[test]
fn test_cli_parse_json_conflicts_with_trace() {
    let mut cmd = yansa_cmd();
    cmd.args(["parse", "--json", "--trace", "Title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_cli_batch_from_file() {
    let temp = tempdir().unwrap();
    let list = temp.path().join("names.txt");
    let out = temp.path().join("results.jsonl");
    fs::write(
        &list,
        "Active Duty - Scene Title.mp4\n\n20200101 Happy times\nJohn Smith & Jane Doe\n",
    )
    .unwrap();

    let mut cmd = yansa_cmd();
    cmd.args(["batch", list.to_str().unwrap(), "--output", out.to_str().unwrap()])
        .assert()
        .success();

    let lines = json_lines(&fs::read(&out).unwrap());
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["studio"], "Active Duty");
    assert_eq!(lines[1]["date"], "2020-01-01");
    assert_eq!(lines[2]["original"], "John Smith & Jane Doe");
}

#[test]
fn test_cli_batch_from_stdin() {
    let mut cmd = assert_cmd::Command::from_std(yansa_cmd());
    let assert = cmd
        .args(["batch", "-", "--studio", "Scary Fuckers"])
        .write_stdin("8492 02 Title Here\nSean Cody - Title\n")
        .assert()
        .success();

    let lines = json_lines(&assert.get_output().stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["studio_code"], "0849202");
    assert_eq!(lines[1]["studio"], "Sean Cody");
}

#[test]
fn test_cli_batch_missing_list() {
    let mut cmd = yansa_cmd();
    cmd.args(["batch", "/nonexistent/names.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open list"));
}

#[test]
fn test_cli_rules_check_bundled() {
    let mut cmd = yansa_cmd();
    cmd.args(["rules", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundled"))
        .stdout(predicate::str::contains("studios.json"))
        .stdout(predicate::str::contains("date_formats.json"));
}

#[test]
fn test_cli_rules_check_directory() {
    let temp = tempdir().unwrap();
    copy_rules(temp.path());

    let mut cmd = yansa_cmd();
    cmd.args(["rules", "check", "--dir", temp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("All rule tables are valid"));
}

#[test]
fn test_cli_rules_check_malformed_table() {
    let temp = tempdir().unwrap();
    copy_rules(temp.path());
    fs::write(temp.path().join("studios.json"), "{ not json").unwrap();

    let mut cmd = yansa_cmd();
    cmd.args(["rules", "check", "--dir", temp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("studios.json"));
}

#[test]
fn test_cli_rules_check_missing_dir() {
    let mut cmd = yansa_cmd();
    cmd.args(["rules", "check", "--dir", "/nonexistent/yansa/rules"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_with_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("yansa.toml");
    fs::write(
        &config_file,
        r#"
[parser]
unknown_studio = "n/a"
"#,
    )
    .unwrap();

    let mut cmd = yansa_cmd();
    let assert = cmd
        .args(["--config", config_file.to_str().unwrap()])
        .args(["parse", "--json", "--studio", "N/A", "8492 02 Title Here"])
        .assert()
        .success();

    let lines = json_lines(&assert.get_output().stdout);
    assert!(lines[0].get("studio").is_none());
    assert!(lines[0].get("studio_code").is_none());
}

#[test]
fn test_cli_invalid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("yansa.toml");
    fs::write(&config_file, "[parser\nbroken").unwrap();

    let mut cmd = yansa_cmd();
    cmd.args(["-c", config_file.to_str().unwrap(), "parse", "Title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
