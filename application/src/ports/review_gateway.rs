//! Review gateway port
//!
//! Defines the interface for submitting a rated transcript.

use crate::ports::chat_gateway::GatewayError;
use async_trait::async_trait;
use empower_domain::FeedbackRecord;
use serde::Deserialize;

/// Acknowledgment returned by the review endpoint.
///
/// The contract is loose; both fields are optional and unknown fields are
/// ignored. Only used for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Gateway for the review endpoint (fire-and-forget)
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    async fn submit_review(&self, record: &FeedbackRecord) -> Result<ReviewAck, GatewayError>;
}
