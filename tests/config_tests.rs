//! Configuration module tests

use exa_cli::config::settings::DEFAULT_BASE_URL;
use exa_cli::config::{CredentialStore, KeySource, Settings};
use exa_cli::AppError;
use std::env;
use std::sync::Mutex;
use tempfile::TempDir;

/// Environment variables are process-wide; tests touching them take this lock
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 6] = [
    "EXA_API_KEY",
    "EXA_API_URL",
    "EXA_TIMEOUT",
    "EXA_DEBUG_BODY_LIMIT",
    "RUST_LOG",
    "LOG_FORMAT",
];

/// Clean up test environment variables
fn cleanup_test_env() {
    for var in &VARS {
        env::remove_var(var);
    }
}

fn empty_store(dir: &TempDir) -> CredentialStore {
    CredentialStore::new(dir.path().join(".exa-auth.json"))
}

#[test]
fn test_defaults_without_credentials() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(&empty_store(&dir)).unwrap();
    assert_eq!(settings.api.api_key, None);
    assert_eq!(settings.api.key_source, None);
    assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.api.timeout, 60);
    assert_eq!(settings.logging.level, "warn");
    assert_eq!(settings.logging.format, "text");

    assert!(matches!(settings.require_api_key(), Err(AppError::MissingCredential)));
}

#[test]
fn test_environment_key_wins_over_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    let dir = TempDir::new().unwrap();
    let store = empty_store(&dir);
    store.save("file-key").unwrap();

    env::set_var("EXA_API_KEY", "env-key");
    let settings = Settings::load(&store).unwrap();
    cleanup_test_env();

    assert_eq!(settings.require_api_key().unwrap(), "env-key");
    assert_eq!(settings.api.key_source, Some(KeySource::Environment));
}

#[test]
fn test_file_key_fallback() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    let dir = TempDir::new().unwrap();
    let store = empty_store(&dir);
    store.save("file-key").unwrap();

    // a blank variable counts as unset
    env::set_var("EXA_API_KEY", "  ");
    let settings = Settings::load(&store).unwrap();
    cleanup_test_env();

    assert_eq!(settings.require_api_key().unwrap(), "file-key");
    assert_eq!(
        settings.api.key_source,
        Some(KeySource::File(store.path().to_path_buf()))
    );
}

#[test]
fn test_unreadable_file_means_no_key() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    let dir = TempDir::new().unwrap();
    let store = empty_store(&dir);
    std::fs::write(store.path(), "{broken").unwrap();

    let settings = Settings::load(&store).unwrap();
    assert!(matches!(settings.require_api_key(), Err(AppError::MissingCredential)));
}

#[test]
fn test_environment_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    let dir = TempDir::new().unwrap();

    env::set_var("EXA_API_URL", "http://localhost:8080");
    env::set_var("EXA_TIMEOUT", "15");
    env::set_var("EXA_DEBUG_BODY_LIMIT", "100");
    env::set_var("LOG_FORMAT", "json");
    let settings = Settings::load(&empty_store(&dir)).unwrap();
    cleanup_test_env();

    assert_eq!(settings.api.base_url, "http://localhost:8080");
    assert_eq!(settings.api.timeout, 15);
    assert_eq!(settings.api.body_log_limit, 100);
    assert_eq!(settings.logging.format, "json");
}

#[test]
fn test_invalid_values_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();

    let cases = [
        ("EXA_TIMEOUT", "soon"),
        ("EXA_TIMEOUT", "0"),
        ("EXA_API_URL", "api.exa.ai"),
        ("LOG_FORMAT", "xml"),
    ];
    for (var, value) in cases {
        cleanup_test_env();
        env::set_var(var, value);
        let result = Settings::load(&empty_store(&dir));
        cleanup_test_env();
        assert!(result.is_err(), "{}={} should be rejected", var, value);
    }
}

#[test]
fn test_credential_round_trip_through_store() {
    let dir = TempDir::new().unwrap();
    let store = empty_store(&dir);

    assert_eq!(store.load().unwrap(), None);
    store.save("exa-abc").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("exa-abc"));

    store.save("exa-def").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("exa-def"));

    let content = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["api_key"], "exa-def");
}
