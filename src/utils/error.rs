//! Error handling module
//!
//! Defines the application error type and the classifier that turns any
//! error into a stable, user-facing report

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// No credential in the environment or the credential file
    #[error("EXA_API_KEY not set and no config file found.\nRun 'exa auth' to configure or set EXA_API_KEY environment variable")]
    MissingCredential,

    /// Malformed local input
    #[error("{0}")]
    Validation(String),

    /// Non-2xx HTTP status
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Connection failure, timeout or broken body
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single SSE chunk that could not be decoded
    #[error("Invalid stream chunk: {0}")]
    StreamDecode(String),

    /// Bad jq expression or runtime failure evaluating it
    #[error("jq error: {0}")]
    Filter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable error codes exposed in JSON mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthRequired,
    AuthInvalid,
    RateLimited,
    NetworkError,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthRequired => "AUTH_REQUIRED",
            ErrorCode::AuthInvalid => "AUTH_INVALID",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

/// Structured error for JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorReport {
    fn recoverable(code: ErrorCode, message: impl Into<String>, suggestion: &str) -> Self {
        Self {
            code,
            message: message.into(),
            recoverable: true,
            suggestion: Some(suggestion.to_string()),
        }
    }

    fn unknown(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Unknown,
            message: message.into(),
            recoverable: false,
            suggestion: None,
        }
    }
}

impl AppError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Map this error onto the user-facing taxonomy
    pub fn classify(&self) -> ErrorReport {
        match self {
            AppError::MissingCredential => ErrorReport::recoverable(
                ErrorCode::AuthRequired,
                self.to_string(),
                "Set EXA_API_KEY environment variable or run 'exa auth'",
            ),
            AppError::Api { status: 401, .. } => ErrorReport::recoverable(
                ErrorCode::AuthInvalid,
                "Invalid API key",
                "Check your EXA_API_KEY value",
            ),
            AppError::Api { status: 429, .. } => ErrorReport::recoverable(
                ErrorCode::RateLimited,
                self.to_string(),
                "Wait and retry, or reduce request frequency",
            ),
            AppError::Network(_) => ErrorReport::recoverable(
                ErrorCode::NetworkError,
                self.to_string(),
                "Check network connectivity",
            ),
            AppError::Api { .. }
            | AppError::Validation(_)
            | AppError::Serialization(_)
            | AppError::StreamDecode(_)
            | AppError::Filter(_)
            | AppError::Config(_)
            | AppError::Io(_) => ErrorReport::unknown(self.to_string()),
        }
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, AppError::MissingCredential | AppError::Api { status: 401, .. })
    }
}

/// Classify an error coming out of a command
///
/// Application errors are found through any context layers; anything else is
/// `UNKNOWN` with its full context chain as the message.
pub fn classify(err: &anyhow::Error) -> ErrorReport {
    match err.downcast_ref::<AppError>() {
        Some(app_error) => {
            let mut report = app_error.classify();
            if report.code != ErrorCode::AuthInvalid {
                report.message = format!("{:#}", err);
            }
            report
        }
        None => ErrorReport::unknown(format!("{:#}", err)),
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error handling helper functions
pub mod helpers {
    use super::*;

    /// Create validation error
    pub fn validation_error(message: impl Into<String>) -> AppError {
        AppError::Validation(message.into())
    }

    /// Create filter evaluation error
    pub fn filter_error(message: impl Into<String>) -> AppError {
        AppError::Filter(message.into())
    }

    /// Create transport error for a non-2xx status
    pub fn api_error(status: u16, body: impl Into<String>) -> AppError {
        AppError::Api {
            status,
            body: body.into(),
        }
    }
}

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add validation error context
    fn validation_context(self, message: &str) -> AppResult<T>;

    /// Add filter error context
    fn filter_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn validation_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Validation(format!("{}: {}", message, e)))
    }

    fn filter_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Filter(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::MissingCredential.classify().code, ErrorCode::AuthRequired);
        assert_eq!(helpers::api_error(401, "nope").classify().code, ErrorCode::AuthInvalid);
        assert_eq!(helpers::api_error(429, "slow down").classify().code, ErrorCode::RateLimited);
        assert_eq!(helpers::api_error(500, "boom").classify().code, ErrorCode::Unknown);
        assert_eq!(helpers::filter_error("bad").classify().code, ErrorCode::Unknown);
    }

    #[test]
    fn test_auth_invalid_message() {
        let report = helpers::api_error(401, "{\"error\":\"bad key\"}").classify();
        assert_eq!(report.message, "Invalid API key");
        assert!(report.recoverable);
        assert_eq!(report.suggestion.as_deref(), Some("Check your EXA_API_KEY value"));
    }

    #[test]
    fn test_error_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let app_result = result.validation_context("read schema file");
        if let Err(AppError::Validation(msg)) = app_result {
            assert!(msg.contains("read schema file"));
            assert!(msg.contains("file not found"));
        } else {
            panic!("Expected validation error");
        }
    }

    #[test]
    fn test_should_log_details() {
        assert!(!AppError::MissingCredential.should_log_details());
        assert!(!helpers::api_error(401, "").should_log_details());
        assert!(helpers::api_error(500, "").should_log_details());
    }
}
