//! Logging utilities
//!
//! Subscriber setup and the debug trace handed to the HTTP client and the
//! stream decoder

use crate::config::settings::LoggingConfig;
use std::fmt::Display;
use tracing::{debug, warn};

/// Default cap on traced request/response bodies
pub const DEFAULT_BODY_LOG_LIMIT: usize = 2000;

/// Initialize logging system
///
/// Logs always go to stderr so they never mix with command output. `--debug`
/// forces the `debug` level regardless of `RUST_LOG`.
pub fn init_logging(config: &LoggingConfig, debug_enabled: bool) {
    let log_level = if debug_enabled {
        "debug".to_string()
    } else {
        config.level.clone()
    };

    let result = if config.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .without_time()
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Truncate a string with a note about the full length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    let total = s.chars().count();
    if total > max_len {
        let head: String = s.chars().take(max_len).collect();
        format!("{}... ({} chars truncated)", head, total - max_len)
    } else {
        s.to_string()
    }
}

/// Truncate a string to `max_len` characters, appending `...` when cut
pub fn truncate_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let head: String = s.chars().take(max_len).collect();
    format!("{}...", head)
}

/// Debug trace for request/response bodies and skipped stream chunks
///
/// Disabled traces emit nothing. Bodies are cut to `body_limit` characters.
/// Headers are never traced, so the API key cannot leak through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugTrace {
    enabled: bool,
    body_limit: usize,
}

impl Default for DebugTrace {
    fn default() -> Self {
        Self::disabled()
    }
}

impl DebugTrace {
    pub fn new(enabled: bool, body_limit: usize) -> Self {
        Self { enabled, body_limit }
    }

    pub fn enabled() -> Self {
        Self::new(true, DEFAULT_BODY_LOG_LIMIT)
    }

    pub fn disabled() -> Self {
        Self::new(false, DEFAULT_BODY_LOG_LIMIT)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Body as it would appear in the trace
    pub fn clip(&self, body: &str) -> String {
        truncate_content(body, self.body_limit)
    }

    pub fn request(&self, method: &str, url: &str, body: Option<&str>) {
        if !self.enabled {
            return;
        }
        match body {
            Some(body) => debug!("{} {} body={}", method, url, self.clip(body)),
            None => debug!("{} {}", method, url),
        }
    }

    pub fn response(&self, status: u16, body: &str) {
        if !self.enabled {
            return;
        }
        debug!("Response status: {}", status);
        debug!("Response body: {}", self.clip(body));
    }

    pub fn skipped_chunk(&self, error: &dyn Display, data: &str) {
        if !self.enabled {
            return;
        }
        warn!("Failed to parse SSE chunk: {} - data: {}", error, self.clip(data));
    }

    pub fn note(&self, message: &str) {
        if self.enabled {
            debug!("{}", message);
        }
    }
}
