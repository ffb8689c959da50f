//! Application-level configuration.
//!
//! - [`ClientConfig`] — endpoint base URL and request timeout policy
//! - [`RequestTimeout`] — how long a single request may stay in flight

pub mod client_config;

pub use client_config::{ClientConfig, DEFAULT_BASE_URL, RequestTimeout};
