//! Raw TOML configuration data types
//!
//! These structs mirror the structure of the TOML config file:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"
//! request_timeout_seconds = 120
//!
//! [logging]
//! conversation_log = "~/.local/share/empower-chat/conversation.jsonl"
//!
//! [tui]
//! tick_millis = 250
//! ```

use empower_application::{ClientConfig, RequestTimeout, config::DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("api.request_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("api.base_url must start with http:// or https:// (got {0})")]
    UnsupportedScheme(String),

    #[error("tui.tick_millis cannot be 0")]
    InvalidTick,
}

/// Raw endpoint configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL for the `/chat` and `/review` endpoints
    pub base_url: String,
    /// Upper bound on a single request
    pub request_timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_seconds: 120,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL conversation log path; disabled when unset
    pub conversation_log: Option<String>,
}

/// Raw TUI configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTuiConfig {
    /// Redraw tick in milliseconds
    pub tick_millis: u64,
}

impl Default for FileTuiConfig {
    fn default() -> Self {
        Self { tick_millis: 250 }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: FileApiConfig,
    pub logging: FileLoggingConfig,
    pub tui: FileTuiConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::UnsupportedScheme(
                base_url.to_string(),
            ));
        }
        if self.api.request_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.tui.tick_millis == 0 {
            return Err(ConfigValidationError::InvalidTick);
        }
        Ok(())
    }

    /// Resolve into the application's client settings.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api.base_url.trim()).with_timeout(RequestTimeout::from_secs(
            self.api.request_timeout_seconds,
        ))
    }
}
