//! Configuration management module
//!
//! Loads settings from environment variables and the credential file

pub mod file;
pub mod settings;

pub use file::{AuthConfig, CredentialStore};
pub use settings::{ApiConfig, KeySource, LoggingConfig, Settings};
