//! Infrastructure layer for empower-chat
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the HTTP gateway for the chat and review endpoints,
//! configuration file loading, and the JSONL conversation logger.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    API_URL_ENV, ConfigLoader, ConfigValidationError, FileApiConfig, FileConfig,
    FileLoggingConfig, FileTuiConfig,
};
pub use http::HttpChatGateway;
pub use logging::JsonlConversationLogger;
