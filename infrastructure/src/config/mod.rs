//! Configuration file loading for empower-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `EMPOWER_API_URL` environment variable (endpoint base URL only)
//! 2. `--config <path>` specified file
//! 3. Project root: `./empower.toml` or `./.empower.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/empower-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileApiConfig, FileConfig, FileLoggingConfig, FileTuiConfig,
};
pub use loader::{API_URL_ENV, ConfigLoader};
