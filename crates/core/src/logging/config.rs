//! Configuration for tracing and instrumentation

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an optional log file
pub const LOG_FILE_ENV: &str = "CHATDESK_LOG_FILE";

/// Main instrumentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name attached to startup events
    pub service_name: String,
    /// Log level filter (e.g., "info", "debug", "chatdesk_http=trace")
    pub log_level: String,
    /// Optional file that receives a plain-text copy of every event
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Whether to write events to stderr
    #[serde(default = "default_console_enabled")]
    pub console_enabled: bool,
}

const fn default_console_enabled() -> bool {
    true
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "chatdesk".to_string(),
            log_level: "info".to_string(),
            log_file: None,
            console_enabled: true,
        }
    }
}

impl InstrumentationConfig {
    /// Create configuration from environment variables
    ///
    /// Supports the following environment variables:
    /// - `RUST_LOG`: Log level filter
    /// - `CHATDESK_LOG_FILE`: Path of a log file to append to
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_file = std::env::var(LOG_FILE_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Self {
            log_level,
            log_file,
            ..Self::default()
        }
    }

    /// Override the log level filter
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Send a copy of all events to the given file
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstrumentationConfig::default();
        assert_eq!(config.service_name, "chatdesk");
        assert_eq!(config.log_level, "info");
        assert!(config.log_file.is_none());
        assert!(config.console_enabled);
    }

    #[test]
    fn test_builder_overrides() {
        let config = InstrumentationConfig::default()
            .with_log_level("debug")
            .with_log_file("/tmp/chatdesk.log");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/chatdesk.log")));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: InstrumentationConfig =
            serde_json::from_str(r#"{"service_name":"cli","log_level":"warn"}"#).unwrap();
        assert!(config.console_enabled);
        assert!(config.log_file.is_none());
    }
}
