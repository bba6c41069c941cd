//! Integration tests for the CLI surface: help, version, argument errors,
//! and error reporting when the scheduler is unreachable.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// CLI bound to a config file inside `dir` that does not exist yet.
fn converge(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("converge"));
    cmd.env("NO_COLOR", "1")
        .env("CONVERGE_CONFIG", dir.path().join("config.yaml"))
        .env_remove("CONVERGE_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

/// An endpoint nothing listens on.
fn dead_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[test]
fn test_no_args_shows_help_on_stderr() {
    let dir = TempDir::new().expect("temp dir");
    converge(&dir).assert().code(2).stderr(predicate::str::contains(
        "Deploy applications to a container scheduler",
    ));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().expect("temp dir");
    let output = converge(&dir).arg("--help").output().expect("run");
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for sub in [
        "list", "show", "deploy", "update", "scale", "restart", "delete", "wait", "health",
        "versions", "rollback", "config",
    ] {
        assert!(help.contains(sub), "help is missing `{sub}`:\n{help}");
    }
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().expect("temp dir");
    converge(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("converge 0.1.0"));
}

#[test]
fn test_negative_instance_count_is_a_usage_error() {
    let dir = TempDir::new().expect("temp dir");
    converge(&dir)
        .args(["scale", "web-1", "-3"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_id_fails_before_contacting_scheduler() {
    let dir = TempDir::new().expect("temp dir");
    converge(&dir)
        .args(["show", "Web_1", "--endpoint", &dead_endpoint()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_invalid_id_json_error_code() {
    let dir = TempDir::new().expect("temp dir");
    let output = converge(&dir)
        .args(["health", "a//b", "--json", "--endpoint", &dead_endpoint()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "invalid_argument");
}

#[test]
fn test_unreachable_scheduler_reports_transient_json_error() {
    let dir = TempDir::new().expect("temp dir");
    let output = converge(&dir)
        .args(["list", "--json", "--endpoint", &dead_endpoint()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "transient");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("Scheduler request failed"))
    );
}

#[test]
fn test_invalid_endpoint_is_a_config_error() {
    let dir = TempDir::new().expect("temp dir");
    converge(&dir)
        .args(["list", "--endpoint", "ftp://scheduler"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_deploy_missing_file_fails() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nope.json");
    converge(&dir)
        .args(["deploy", missing.to_str().expect("utf-8 path"), "--endpoint", &dead_endpoint()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.json"));
}
