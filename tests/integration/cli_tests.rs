//! CLI integration tests
//!
//! Runs the spannercheck binary against the fixture exports and checks
//! exit codes, output formats and configuration handling.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn spannercheck() -> Command {
    Command::cargo_bin("spannercheck").expect("binary should be built")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_version() {
    spannercheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("spannercheck"));
}

#[test]
fn test_cli_help() {
    spannercheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--parallel"))
        .stdout(predicate::str::contains("--exclude"));
}

#[test]
fn test_empty_directory_reports_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");

    spannercheck()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No SSA exports found."));
}

// ============================================================================
// Exit Codes and Terminal Output
// ============================================================================

#[test]
fn test_leaking_exports_exit_nonzero() {
    let leaking = fixtures_path().join("ir/leaking");
    if !leaking.exists() {
        eprintln!("Fixture not found: {:?}", leaking);
        return;
    }

    spannercheck()
        .arg(&leaking)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("must be deferred"))
        .stdout(predicate::str::contains("SC001"))
        .stdout(predicate::str::contains("unclosed transactions"));
}

#[test]
fn test_clean_exports_exit_zero() {
    let clean = fixtures_path().join("ir/clean");
    if !clean.exists() {
        eprintln!("Fixture not found: {:?}", clean);
        return;
    }

    spannercheck()
        .arg(&clean)
        .assert()
        .success()
        .stdout(predicate::str::contains("No leaking resource handles found!"));
}

#[test]
fn test_suppressed_exports_exit_zero() {
    let suppressed = fixtures_path().join("ir/suppressed");
    if !suppressed.exists() {
        return;
    }

    spannercheck().arg(&suppressed).assert().success();
}

#[test]
fn test_parallel_mode() {
    let leaking = fixtures_path().join("ir/leaking");
    if !leaking.exists() {
        return;
    }

    spannercheck()
        .arg("--parallel")
        .arg(&leaking)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Parallel mode"))
        .stdout(predicate::str::contains("must be deferred"));
}

// ============================================================================
// Output Formats
// ============================================================================

#[test]
fn test_json_format() {
    let leaking = fixtures_path().join("ir/leaking");
    if !leaking.exists() {
        return;
    }

    spannercheck()
        .args(["--format", "json", "--quiet"])
        .arg(&leaking)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"total_leaks\": 3"))
        .stdout(predicate::str::contains("\"code\": \"SC001\""))
        .stdout(predicate::str::contains("must be deferred"));
}

#[test]
fn test_sarif_format() {
    let leaking = fixtures_path().join("ir/leaking");
    if !leaking.exists() {
        return;
    }

    spannercheck()
        .args(["--format", "sarif", "--quiet"])
        .arg(&leaking)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"version\": \"2.1.0\""))
        .stdout(predicate::str::contains("spannercheck"));
}

#[test]
fn test_json_output_file() {
    let leaking = fixtures_path().join("ir/leaking");
    if !leaking.exists() {
        return;
    }

    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("report.json");

    spannercheck()
        .args(["--format", "json", "--output"])
        .arg(&out)
        .arg(&leaking)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Report written to:"));

    let written = std::fs::read_to_string(&out).expect("report file should exist");
    assert!(written.contains("\"total_leaks\": 3"));
    assert!(written.contains("RowIterator.Stop() must be deferred"));
}

// ============================================================================
// Targets, Exclusions and Config Files
// ============================================================================

#[test]
fn test_exclude_flag_drops_findings() {
    let root = fixtures_path().join("ir");
    if !root.exists() {
        return;
    }

    spannercheck()
        .args(["--exclude", "**/leaking/**"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("No leaking resource handles found!"));
}

#[test]
fn test_target_flag_narrows_scan() {
    let root = fixtures_path().join("ir");
    if !root.exists() {
        return;
    }

    spannercheck()
        .args(["--target", "clean"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("No leaking resource handles found!"));
}

#[test]
fn test_config_file_exclude() {
    let root = fixtures_path().join("ir");
    if !root.exists() {
        return;
    }

    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("check.yml");
    std::fs::write(&config_path, "exclude:\n  - \"**/leaking/**\"\n")
        .expect("config should be written");

    spannercheck()
        .arg("--config")
        .arg(&config_path)
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("No leaking resource handles found!"));
}

#[test]
fn test_config_file_format() {
    let leaking = fixtures_path().join("ir/leaking");
    if !leaking.exists() {
        return;
    }

    // With no --format flag the format comes from the config file.
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("check.yml");
    std::fs::write(&config_path, "report:\n  format: json\n").expect("config should be written");

    spannercheck()
        .arg("--config")
        .arg(&config_path)
        .arg("--quiet")
        .arg(&leaking)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"total_leaks\""));
}
