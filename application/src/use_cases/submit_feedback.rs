//! Submit Feedback use case
//!
//! Shows the rating prompt, starts a fresh session, and submits the rated
//! transcript to the review endpoint. The reset happens before the review
//! call; a failed or abandoned submission is logged, never surfaced.

use crate::config::RequestTimeout;
use crate::ports::chat_gateway::GatewayError;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::review_gateway::{ReviewAck, ReviewGateway};
use crate::store::session_store::SessionStore;
use empower_domain::{FeedbackRecord, Rating};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Visibility of the feedback prompt.
///
/// Shared with the presentation layer so an overlay can be closed from
/// outside the controller (e.g. a click outside it).
#[derive(Debug, Default)]
pub struct FeedbackPrompt {
    visible: AtomicBool,
}

impl FeedbackPrompt {
    pub fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

/// How a feedback submission went. The session is reset either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Submitted(ReviewAck),
    SubmissionFailed,
}

/// Records a review that was dropped before the endpoint answered, e.g.
/// when the app quits with the submission still in flight.
struct ReviewGuard<'a> {
    logger: &'a dyn ConversationLogger,
    record: &'a FeedbackRecord,
    finished: bool,
}

impl ReviewGuard<'_> {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for ReviewGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!(rating = %self.record.rating, "Review abandoned before completion");
            log_review_failed(self.logger, self.record, "aborted", "review abandoned");
        }
    }
}

fn log_review_failed(
    logger: &dyn ConversationLogger,
    record: &FeedbackRecord,
    kind: &str,
    error: &str,
) {
    logger.log(ConversationEvent::new(
        "review_failed",
        json!({
            "rating": record.rating.as_str(),
            "kind": kind,
            "error": error,
            "transcript": record.transcript,
        }),
    ));
}

/// Use case for rating and resetting a session
pub struct FeedbackController<R: ReviewGateway + 'static> {
    gateway: Arc<R>,
    store: SessionStore,
    prompt: Arc<FeedbackPrompt>,
    timeout: RequestTimeout,
    logger: Arc<dyn ConversationLogger>,
}

impl<R: ReviewGateway + 'static> FeedbackController<R> {
    pub fn new(gateway: Arc<R>, store: SessionStore) -> Self {
        Self {
            gateway,
            store,
            prompt: Arc::new(FeedbackPrompt::default()),
            timeout: RequestTimeout::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_timeout(mut self, timeout: RequestTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn prompt(&self) -> Arc<FeedbackPrompt> {
        Arc::clone(&self.prompt)
    }

    /// Show the rating prompt. Does not touch the session.
    pub fn request_feedback(&self) {
        self.prompt.show();
    }

    /// Hide the prompt without rating.
    pub fn dismiss(&self) {
        self.prompt.hide();
    }

    pub fn is_prompt_visible(&self) -> bool {
        self.prompt.is_visible()
    }

    /// Rate the current transcript, reset the session and submit the rating.
    pub async fn submit(&self, rating: Rating) -> FeedbackOutcome {
        self.submit_record(rating, None).await
    }

    /// Like [`submit`](Self::submit) with a free-text comment attached.
    pub async fn submit_with_comment(
        &self,
        rating: Rating,
        comment: impl Into<String>,
    ) -> FeedbackOutcome {
        self.submit_record(rating, Some(comment.into())).await
    }

    async fn submit_record(&self, rating: Rating, comment: Option<String>) -> FeedbackOutcome {
        // The prompt closes before the network call.
        self.prompt.hide();

        // The session resets before the review is sent, so turns started
        // while it is in flight belong to the new session.
        let mut record = FeedbackRecord::new(rating, self.store.take());
        if let Some(comment) = comment {
            record = record.with_comment(comment);
        }
        self.logger.log(ConversationEvent::new(
            "session_reset",
            json!({ "epoch": self.store.epoch() }),
        ));

        debug!(
            rating = %record.rating,
            messages = record.transcript.len(),
            "Submitting review"
        );

        let guard = ReviewGuard {
            logger: self.logger.as_ref(),
            record: &record,
            finished: false,
        };

        let outcome = match self.send(&record).await {
            Ok(ack) => {
                info!(rating = %record.rating, status = ?ack.status, "Review submitted");
                self.logger.log(ConversationEvent::new(
                    "review_submitted",
                    json!({
                        "rating": record.rating.as_str(),
                        "messages": record.transcript.len(),
                        "status": ack.status,
                    }),
                ));
                FeedbackOutcome::Submitted(ack)
            }
            Err(e) => {
                warn!(error = %e, rating = %record.rating, "Review submission failed");
                log_review_failed(self.logger.as_ref(), &record, e.kind(), &e.to_string());
                FeedbackOutcome::SubmissionFailed
            }
        };
        guard.finish();

        outcome
    }

    async fn send(&self, record: &FeedbackRecord) -> Result<ReviewAck, GatewayError> {
        match self.timeout {
            RequestTimeout::Unbounded => self.gateway.submit_review(record).await,
            RequestTimeout::After(limit) => {
                tokio::time::timeout(limit, self.gateway.submit_review(record))
                    .await
                    .map_err(|_| GatewayError::Timeout)?
            }
        }
    }
}
