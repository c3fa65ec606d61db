//! Unit tests for configuration resolution and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MCC_* variables are marked with #[serial].

use mcc_common::config::{
    ConfigOverrides, ConfigResolver, DEFAULT_API_URL, DEFAULT_REALTIME_URL, ENV_API_URL,
    ENV_REALTIME_URL, ENV_REQUEST_TIMEOUT_SECS, ENV_TOKEN_FILE,
};
use mcc_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_API_URL);
    env::remove_var(ENV_REALTIME_URL);
    env::remove_var(ENV_TOKEN_FILE);
    env::remove_var(ENV_REQUEST_TIMEOUT_SECS);
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_missing_config_file_uses_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();

    let config = ConfigResolver::default()
        .with_config_file(dir.path().join("absent.toml"))
        .resolve()
        .unwrap();

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.realtime_url, DEFAULT_REALTIME_URL);
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert!(config.token_file.ends_with("session.toml"));
}

#[test]
#[serial]
fn test_config_file_values_apply() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
api_url = "http://media.local:8000/"
realtime_url = "wss://media.local/ws"
token_file = "/tmp/mcc-test-session.toml"
request_timeout_secs = 3
"#,
    );

    let config = ConfigResolver::default().with_config_file(path).resolve().unwrap();

    assert_eq!(config.api_url, "http://media.local:8000");
    assert_eq!(config.realtime_url, "wss://media.local/ws");
    assert_eq!(config.token_file, PathBuf::from("/tmp/mcc-test-session.toml"));
    assert_eq!(config.request_timeout, Duration::from_secs(3));
}

#[test]
#[serial]
fn test_env_overrides_config_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "api_url = \"http://from-file:1\"\n");
    env::set_var(ENV_API_URL, "http://from-env:2");
    env::set_var(ENV_REQUEST_TIMEOUT_SECS, "7");

    let config = ConfigResolver::default().with_config_file(path).resolve().unwrap();
    clear_env();

    assert_eq!(config.api_url, "http://from-env:2");
    assert_eq!(config.request_timeout, Duration::from_secs(7));
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    env::set_var(ENV_REALTIME_URL, "ws://from-env:2");

    let overrides = ConfigOverrides {
        realtime_url: Some("ws://from-cli:3".to_string()),
        ..ConfigOverrides::default()
    };
    let config = ConfigResolver::new(overrides)
        .with_config_file(dir.path().join("absent.toml"))
        .resolve()
        .unwrap();
    clear_env();

    assert_eq!(config.realtime_url, "ws://from-cli:3");
}

#[test]
#[serial]
fn test_malformed_config_file_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "api_url = [not toml");

    let result = ConfigResolver::default().with_config_file(path).resolve();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_invalid_timeout_env_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    env::set_var(ENV_REQUEST_TIMEOUT_SECS, "soon");

    let result = ConfigResolver::default()
        .with_config_file(dir.path().join("absent.toml"))
        .resolve();
    clear_env();

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_wrong_scheme_is_rejected() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let overrides = ConfigOverrides {
        realtime_url: Some("http://not-a-socket".to_string()),
        ..ConfigOverrides::default()
    };

    let result = ConfigResolver::new(overrides)
        .with_config_file(dir.path().join("absent.toml"))
        .resolve();
    assert!(matches!(result, Err(Error::Config(_))));
}
