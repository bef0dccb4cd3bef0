//! End-to-end tests for the osc binary
//!
//! These run without a storage server: they cover profile management and
//! the failure paths that are decided before any request is sent.

use std::path::Path;
use std::process::{Command, Output};

/// Run osc with an isolated config directory
fn run_osc(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_osc"))
        .args(args)
        .env("OBJSTORE_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute osc")
}

#[test]
fn test_profile_set_and_list_json() {
    let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_osc(
        &[
            "profile",
            "set",
            "local",
            "localhost:9000",
            "accesskey",
            "secretkey",
            "--insecure",
            "--bucket-lookup",
            "path",
        ],
        config_dir.path(),
    );
    assert!(
        output.status.success(),
        "profile set failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(config_dir.path().join("config.toml").exists());

    let output = run_osc(&["profile", "list", "--json"], config_dir.path());
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("profile list output is not JSON");
    let profiles = json["profiles"].as_array().expect("profiles array");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["name"], "local");
    assert_eq!(profiles[0]["bucket_lookup"], "path");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("secretkey"), "secret leaked in listing");
}

#[test]
fn test_profile_remove_unknown_exits_not_found() {
    let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_osc(&["profile", "remove", "ghost"], config_dir.path());
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_invalid_path_exits_usage_error() {
    let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_osc(&["get", "just-a-profile"], config_dir.path());
    assert_eq!(output.status.code(), Some(2));

    let output = run_osc(&["ls", ""], config_dir.path());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_profile_exits_not_found() {
    let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_osc(&["ls", "missing/bucket", "--json"], config_dir.path());
    assert_eq!(output.status.code(), Some(5));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing"), "unexpected stderr: {stderr}");
}

#[test]
fn test_put_missing_source_file() {
    let config_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = config_dir.path().join("does-not-exist.bin");

    let output = run_osc(
        &["put", missing.to_str().unwrap(), "local/bucket/key"],
        config_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
}
