//! CLI Integration Tests
//!
//! These tests run the `clinicdesk` binary end-to-end. None of them need a
//! live backend: they cover argument handling, configuration and the failure
//! path against a closed port.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// CLI command with an isolated config file and no inherited credentials
fn cli_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clinicdesk").expect("Failed to find clinicdesk binary");
    cmd.arg("--config")
        .arg(config_dir.path().join("config.json"))
        .env_remove("CLINICDESK_BASE_URL")
        .env_remove("CLINICDESK_TOKEN")
        .env_remove("CLINICDESK_TENANT")
        .env_remove("CLINICDESK_LOGS_DIR")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_fetch_requires_reference() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir).arg("fetch").assert().failure();
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_defaults() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8080"))
        .stdout(predicate::str::contains("\"timeout_secs\": 30"));
}

#[test]
fn test_config_redacts_token() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .args(["--token", "super-secret-session", "--tenant", "st-marys", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("st-marys"))
        .stdout(predicate::str::contains("super-secret-session").not());
}

#[test]
fn test_config_reads_environment() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .env("CLINICDESK_BASE_URL", "https://api.clinic.example")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.clinic.example"));
}

#[test]
fn test_config_save_round_trips_through_file() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .args(["--base-url", "https://api.clinic.example", "--tenant", "st-marys"])
        .args(["config", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved:"));

    let saved = std::fs::read_to_string(config_dir.path().join("config.json")).unwrap();
    assert!(saved.contains("https://api.clinic.example"));

    // Later runs pick the file up without any flags.
    cli_cmd(&config_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("st-marys"));
}

#[test]
fn test_rejects_non_http_base_url() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .args(["--base-url", "ftp://files.clinic.example", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_rejects_malformed_config_file() {
    let config_dir = TempDir::new().unwrap();
    std::fs::write(config_dir.path().join("config.json"), "{ not json").unwrap();

    cli_cmd(&config_dir)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

// ============================================================================
// Fetch Command Tests
// ============================================================================

#[test]
fn test_fetch_unreachable_server_fails() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .args(["--base-url", "http://127.0.0.1:9", "--timeout", "5"])
        .args(["fetch", "/media/42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch"));
}

#[test]
fn test_fetch_rejects_unsupported_scheme() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .args(["fetch", "file:///etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid reference"));
}

#[test]
fn test_fetch_rejects_unknown_kind() {
    let config_dir = TempDir::new().unwrap();

    cli_cmd(&config_dir)
        .args(["fetch", "/media/42", "--kind", "hologram"])
        .assert()
        .failure();
}
