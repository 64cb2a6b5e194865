//! Command line behaviour

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Snapshots {
    _dir: TempDir,
    old: PathBuf,
    new: PathBuf,
}

fn snapshots(old: &str, new: &str) -> Snapshots {
    let dir = TempDir::new().unwrap();
    let old_path = dir.path().join("old.csv");
    let new_path = dir.path().join("new.csv");
    fs::write(&old_path, old).unwrap();
    fs::write(&new_path, new).unwrap();
    Snapshots {
        _dir: dir,
        old: old_path,
        new: new_path,
    }
}

fn csvcompare() -> Command {
    Command::cargo_bin("csvcompare").unwrap()
}

#[test]
fn terminal_report_and_change_exit_code() {
    let files = snapshots("id,v\n1,10\n2,20\n", "id,v\n1,15\n2,18\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .args(["--id", "id", "--value", "v", "--color", "never"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Positive differences: 1"))
        .stdout(predicate::str::contains("Negative differences: 1"))
        .stdout(predicate::str::contains("Per-ID Differences:"));
}

#[test]
fn unchanged_values_exit_zero() {
    let files = snapshots("id,v\n1,10\n", "id,v\n1,10\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Zero:     1"));
}

#[test]
fn json_output_with_ids_filter() {
    let files = snapshots("id,v\n1,10\n2,20\n", "id,v\n1,15\n2,18\n");

    let output = csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .args(["--format", "json", "--ids", "2, 3"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["rows"][0]["diff"], -2);
    assert_eq!(value["filter"]["mode"], "numeric");
}

#[test]
fn ids_file_is_read() {
    let files = snapshots("id,v\n1,10\n2,20\n", "id,v\n1,10\n2,25\n");
    let ids = files.old.with_file_name("ids.txt");
    fs::write(&ids, "1\n").unwrap();

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .arg("--ids-file")
        .arg(&ids)
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched:  1"));
}

#[test]
fn schema_mismatch_fails_with_message() {
    let files = snapshots("id,v,x\n1,10,a\n", "id,v\n1,15\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing from new file: x"));
}

#[test]
fn html_report() {
    let files = snapshots("id,v\n1,10\n", "id,v\n1,7\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .args(["--format", "html"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<svg"));
}

#[test]
fn unsupported_extension_is_an_error() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.xlsx");
    fs::write(&old, "id,v\n").unwrap();

    csvcompare()
        .arg(&old)
        .arg(&old)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn verbose_logs_pipeline_steps() {
    let files = snapshots("id,v\n1,10\n", "id,v\n1,12\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .args(["--summary-only", "--verbose"])
        .env_remove("RUST_LOG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Joined"));
}

#[test]
fn quiet_by_default() {
    let files = snapshots("id,v\n1,10\n", "id,v\n1,12\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .arg("--summary-only")
        .env_remove("RUST_LOG")
        .assert()
        .code(1)
        .stderr(predicate::str::is_empty());
}

#[test]
fn rust_log_enables_debug_output() {
    let files = snapshots("id,v\n1,10\n", "id,v\n1,12\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .arg("--summary-only")
        .env("RUST_LOG", "debug")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Joined"));
}

#[test]
fn compact_json_is_one_line() {
    let files = snapshots("id,v\n1,10\n2,20\n", "id,v\n1,15\n2,18\n");

    let output = csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .args(["--format", "json", "--compact"])
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["summary"]["positive"], 1);
}

#[test]
fn non_numeric_value_names_file_and_line() {
    let files = snapshots("id,v\n1,10\n2,20\n", "id,v\n1,15\n2,n/a\n");

    csvcompare()
        .arg(&files.old)
        .arg(&files.new)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("value 'n/a' for id 2 (new file, line 3)"));
}
