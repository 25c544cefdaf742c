//! Common utilities for CLI E2E tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use mytimer_core::Preferences;

/// Invoke the CLI against `data_dir` and return (stdout, stderr, code).
pub fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_mytimer"))
        .args(args)
        .env("MYTIMER_DATA_DIR", data_dir)
        .env("MYTIMER_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Invoke a CLI command and expect success.
pub fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(
        code, 0,
        "CLI command failed with code {code}: {args:?}\nstderr: {stderr}"
    );
    stdout
}

/// Invoke a CLI command and expect failure.
pub fn run_cli_failure(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert!(code != 0, "CLI command unexpectedly succeeded: {args:?}");
    (stdout, stderr, code)
}

/// Run a timer command and parse its JSON report.
pub fn timer(data_dir: &Path, action: &str) -> serde_json::Value {
    let stdout = run_cli_success(data_dir, &["timer", action]);
    parse_json(&stdout)
}

/// Parse JSON output from CLI.
pub fn parse_json<T: for<'de> serde::Deserialize<'de>>(json: &str) -> T {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

/// Check if string contains substring
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{}' to contain '{}'",
        haystack, needle
    );
}

/// Event types reported in a timer command's output, in order.
pub fn event_types(report: &serde_json::Value) -> Vec<String> {
    report["events"]
        .as_array()
        .expect("events array")
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Open the same stores the CLI uses, to plant state between runs.
pub fn open_store(data_dir: &Path) -> Preferences {
    Preferences::open_in(data_dir).expect("Failed to open stores")
}
