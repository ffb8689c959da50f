//! Client configuration: where requests go and how long they may take.

use std::time::Duration;

/// Base URL used when neither a config file nor the environment overrides it.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Upper bound on a single in-flight request.
///
/// `Unbounded` leaves a hung request pending until the transport itself
/// gives up. `After` fails the request once the duration elapses, which
/// clears the in-flight flag and records the failure sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTimeout {
    Unbounded,
    After(Duration),
}

impl RequestTimeout {
    pub fn from_secs(secs: u64) -> Self {
        RequestTimeout::After(Duration::from_secs(secs))
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            RequestTimeout::Unbounded => None,
            RequestTimeout::After(d) => Some(*d),
        }
    }
}

impl Default for RequestTimeout {
    fn default() -> Self {
        RequestTimeout::from_secs(120)
    }
}

/// Resolved client settings handed to the gateway and use cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint base URL, without trailing slash (e.g. `http://localhost:5000`).
    pub base_url: String,
    pub timeout: RequestTimeout,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: RequestTimeout::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    // ==================== Builder Methods ====================

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: RequestTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL for an endpoint path such as `/chat`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
