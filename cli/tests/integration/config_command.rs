//! Integration tests for `converge config`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn converge(config: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("converge"));
    cmd.env("NO_COLOR", "1")
        .env("CONVERGE_CONFIG", config)
        .env_remove("CONVERGE_ENDPOINT");
    cmd
}

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    converge(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_str().expect("utf-8 path")));
}

#[test]
fn test_config_show_defaults_as_json() {
    let dir = TempDir::new().expect("temp dir");
    let output = converge(&dir.path().join("config.yaml"))
        .args(["config", "show", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(body["config"]["endpoint"], "http://127.0.0.1:8080");
    assert_eq!(body["config"]["poll_interval_ms"], 500);
}

#[test]
fn test_config_set_persists_value() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");

    converge(&path)
        .args(["config", "set", "endpoint", "http://10.0.0.7:8080"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set endpoint = http://10.0.0.7:8080"));

    let saved = std::fs::read_to_string(&path).expect("config written");
    assert!(saved.contains("http://10.0.0.7:8080"));

    converge(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://10.0.0.7:8080"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    converge(&path)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown setting: colour"));
    assert!(!path.exists());
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    converge(&path)
        .args(["config", "set", "poll_interval_ms", "soon"])
        .assert()
        .code(1);
    converge(&path)
        .args(["config", "set", "endpoint", "not a url"])
        .assert()
        .code(1);
    converge(&path)
        .args(["config", "set", "default_deployment_timeout_secs", "18446744073709551615"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must not exceed"));
    assert!(!path.exists());
}

#[test]
fn test_config_show_works_with_invalid_stored_endpoint() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "endpoint: ftp://old-scheduler\n").expect("write");
    converge(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ftp://old-scheduler"));
}
