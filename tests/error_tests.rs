//! Error classification and rendering tests

use anyhow::Context;
use exa_cli::output::render::format_error;
use exa_cli::output::OutputMode;
use exa_cli::utils::error::helpers::*;
use exa_cli::{classify, AppError, ErrorCode};
use serde_json::Value;

#[test]
fn test_missing_credential() {
    let report = classify(&anyhow::Error::from(AppError::MissingCredential));
    assert_eq!(report.code, ErrorCode::AuthRequired);
    assert!(report.recoverable);
    assert!(report.message.contains("EXA_API_KEY"));
    assert_eq!(
        report.suggestion.as_deref(),
        Some("Set EXA_API_KEY environment variable or run 'exa auth'")
    );
}

#[test]
fn test_status_classification() {
    let cases = [
        (401, ErrorCode::AuthInvalid, true),
        (429, ErrorCode::RateLimited, true),
        (400, ErrorCode::Unknown, false),
        (500, ErrorCode::Unknown, false),
    ];

    for (status, code, recoverable) in cases {
        let report = classify(&anyhow::Error::from(api_error(status, "body")));
        assert_eq!(report.code, code, "status {}", status);
        assert_eq!(report.recoverable, recoverable, "status {}", status);
    }
}

#[test]
fn test_rate_limit_suggestion() {
    let report = classify(&anyhow::Error::from(api_error(429, "slow down")));
    assert_eq!(
        report.suggestion.as_deref(),
        Some("Wait and retry, or reduce request frequency")
    );
}

#[test]
fn test_classification_sees_through_context() {
    let err: anyhow::Result<()> = Err(api_error(401, "nope")).context("search failed");
    let report = classify(&err.unwrap_err());
    assert_eq!(report.code, ErrorCode::AuthInvalid);
    assert_eq!(report.message, "Invalid API key");
}

#[test]
fn test_unknown_errors() {
    let plain = classify(&anyhow::anyhow!("something odd"));
    assert_eq!(plain.code, ErrorCode::Unknown);
    assert!(!plain.recoverable);
    assert!(plain.suggestion.is_none());
    assert_eq!(plain.message, "something odd");

    let filter = classify(&anyhow::Error::from(filter_error("bad expression")));
    assert_eq!(filter.code, ErrorCode::Unknown);
    assert!(filter.message.contains("bad expression"));

    let validation = classify(&anyhow::Error::from(validation_error("read schema file")));
    assert_eq!(validation.code, ErrorCode::Unknown);
}

#[test]
fn test_json_error_rendering() {
    let line = format_error(&anyhow::Error::from(api_error(429, "slow")), OutputMode::Json);
    let value: Value = serde_json::from_str(&line).unwrap();

    assert_eq!(value["code"], "RATE_LIMITED");
    assert_eq!(value["recoverable"], true);
    assert!(value["message"].as_str().unwrap().contains("429"));
    assert!(value["suggestion"].is_string());
}

#[test]
fn test_json_error_without_suggestion() {
    let line = format_error(&anyhow::anyhow!("boom"), OutputMode::Json);
    let value: Value = serde_json::from_str(&line).unwrap();

    assert_eq!(value["code"], "UNKNOWN");
    assert_eq!(value["recoverable"], false);
    assert!(value.get("suggestion").is_none());
}

#[test]
fn test_text_error_rendering() {
    let line = format_error(&anyhow::Error::from(validation_error("API key cannot be empty")), OutputMode::Table);
    assert_eq!(line, "Error: API key cannot be empty");

    let line = format_error(&anyhow::anyhow!("boom"), OutputMode::Plaintext);
    assert_eq!(line, "Error: boom");
}

#[test]
fn test_error_code_strings() {
    assert_eq!(ErrorCode::AuthRequired.as_str(), "AUTH_REQUIRED");
    assert_eq!(ErrorCode::AuthInvalid.as_str(), "AUTH_INVALID");
    assert_eq!(ErrorCode::RateLimited.as_str(), "RATE_LIMITED");
    assert_eq!(ErrorCode::NetworkError.as_str(), "NETWORK_ERROR");
    assert_eq!(ErrorCode::Unknown.as_str(), "UNKNOWN");
}
