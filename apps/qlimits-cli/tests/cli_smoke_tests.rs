#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the qlimits binary
//!
//! Each test writes a limits file into a temporary directory and runs the
//! binary against it.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const LIMITS_YAML: &str = r"
settings:
  max_top: 1000
model:
  types:
    Customer: { max_top: 40 }
  properties:
    Customer:
      orders: { max_top: 10 }
";

fn write_limits(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("limits.yaml");
    std::fs::write(&path, LIMITS_YAML).unwrap();
    path
}

/// Helper to run the qlimits binary with given arguments and extra env
fn run_qlimits(args: &[&str], env: &[(&str, &str)]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qlimits"));
    cmd.args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute qlimits")
}

#[test]
fn test_cli_help_command() {
    let output = run_qlimits(&["--help"], &[]);

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(
        stdout.contains("print-config"),
        "Should contain 'print-config' subcommand"
    );
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_check_within_limits() {
    let dir = TempDir::new().unwrap();
    let config = write_limits(&dir);

    let output = run_qlimits(
        &[
            "-c",
            config.to_str().unwrap(),
            "check",
            "--type",
            "Customer",
            "--query",
            "$top=40",
        ],
        &[],
    );

    assert!(output.status.success(), "40 is within the type limit");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "OK");
}

#[test]
fn test_check_property_limit_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_limits(&dir);

    let output = run_qlimits(
        &[
            "-c",
            config.to_str().unwrap(),
            "check",
            "--type",
            "Customer",
            "--property",
            "orders",
            "--query",
            "$top=20",
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1), "Client errors exit with 1");
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["dimension"], "$top");
    assert_eq!(body["limit"], 10);
    assert_eq!(body["requested"], 20);
    assert_eq!(body["scope"], "property");
    assert_eq!(body["instance"], "$top=20");
}

#[test]
fn test_check_invalid_value_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_limits(&dir);

    let output = run_qlimits(
        &[
            "-c",
            config.to_str().unwrap(),
            "check",
            "--type",
            "Customer",
            "--query",
            "$skip=many",
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["code"], "qlimits.invalid_value.v1");
    assert_eq!(body["dimension"], "$skip");
}

#[test]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let config = write_limits(&dir);

    let output = run_qlimits(
        &[
            "-c",
            config.to_str().unwrap(),
            "check",
            "--type",
            "Customer",
            "--query",
            "$top=6",
            "--json",
        ],
        &[("QLIMITS__SETTINGS__MAX_TOP", "5")],
    );

    assert_eq!(output.status.code(), Some(1));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["limit"], 5);
    assert_eq!(body["scope"], "global");
}

#[test]
fn test_env_annotations_keep_name_case() {
    let output = run_qlimits(
        &["check", "--type", "Customer", "--property", "orders", "--query", "$top=8"],
        &[
            ("QLIMITS__MODEL__TYPES__Customer__MAX_TOP", "50"),
            ("QLIMITS__MODEL__PROPERTIES__Customer__orders__MAX_TOP", "5"),
        ],
    );

    assert_eq!(output.status.code(), Some(1), "Env property limit applies");
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["limit"], 5);
    assert_eq!(body["scope"], "property");

    let output = run_qlimits(
        &["check", "--type", "Customer", "--query", "$top=60"],
        &[("QLIMITS__MODEL__TYPES__Customer__MAX_TOP", "50")],
    );
    assert_eq!(output.status.code(), Some(1), "Env type limit applies");
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["limit"], 50);
    assert_eq!(body["scope"], "type");
}

#[test]
fn test_json_success_output() {
    let output = run_qlimits(
        &["check", "--type", "Anything", "--query", "$top=123456", "--json"],
        &[],
    );

    assert!(output.status.success(), "No limits configured means no rejection");
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["ok"], true);
}

#[test]
fn test_print_config() {
    let dir = TempDir::new().unwrap();
    let config = write_limits(&dir);

    let output = run_qlimits(&["-c", config.to_str().unwrap(), "print-config"], &[]);

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["settings"]["max_top"], 1000);
    assert_eq!(body["model"]["properties"]["Customer"]["orders"]["max_top"], 10);
}

#[test]
fn test_missing_config_file() {
    let output = run_qlimits(
        &[
            "-c",
            "/nonexistent/limits.yaml",
            "check",
            "--type",
            "Customer",
            "--query",
            "$top=1",
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config file does not exist"),
        "Should explain the missing file: {stderr}"
    );
}
