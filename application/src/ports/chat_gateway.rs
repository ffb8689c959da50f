//! Chat gateway port
//!
//! Defines the interface for sending a transcript to the inference service.

use async_trait::async_trait;
use empower_domain::Message;
use thiserror::Error;

/// Errors that can occur while talking to a remote endpoint
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Short machine-readable label, used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Connection(_) => "connection",
            GatewayError::Status { .. } => "status",
            GatewayError::MalformedResponse(_) => "malformed_response",
            GatewayError::Timeout => "timeout",
            GatewayError::Other(_) => "other",
        }
    }
}

/// Gateway for the inference endpoint
///
/// The service is stateless from the client's point of view: every call
/// carries the entire transcript and yields a single reply.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send the full transcript and return the reply text verbatim.
    async fn send_chat(&self, messages: &[Message]) -> Result<String, GatewayError>;
}
