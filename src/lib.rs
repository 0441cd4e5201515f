//! Exa CLI Library
//!
//! Request building, HTTP transport, answer streaming, response reshaping and
//! rendering for the Exa search API

pub mod commands;
pub mod config;
pub mod models;
pub mod output;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use output::{reshape, OutputMode, OutputOptions};
pub use services::{ExaClient, HttpTransport, StreamDecoder, Transport};
pub use utils::error::{classify, AppError, AppResult, ErrorCode, ErrorReport};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
