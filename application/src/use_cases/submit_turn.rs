//! Submit Turn use case
//!
//! Drives one request/response cycle: append the user's message, send the
//! whole transcript to the chat endpoint, and record the reply. Failures of
//! any kind are recorded as the failure sentinel; they never propagate.

use crate::config::RequestTimeout;
use crate::ports::chat_gateway::{ChatGateway, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::store::session_store::SessionStore;
use empower_domain::Message;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was empty or whitespace only.
    Blank,
    /// Another turn is still in flight.
    Pending,
}

/// How a call to [`RequestCoordinator::submit_turn`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing was appended or sent.
    Rejected(RejectReason),
    /// The reply was appended.
    Completed,
    /// The request failed; the failure sentinel was appended.
    Failed,
    /// The session was reset while the request was in flight; the result
    /// was dropped.
    Discarded,
}

/// Clears the in-flight flag if the turn ends without reaching
/// `complete_turn`, e.g. when the submitting future is dropped.
struct TurnGuard<'a> {
    store: &'a SessionStore,
    epoch: u64,
    finished: bool,
}

impl TurnGuard<'_> {
    fn finish(mut self, message: Message) -> bool {
        self.finished = true;
        self.store.complete_turn(self.epoch, message)
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!(epoch = self.epoch, "Turn dropped before completion");
            self.store.abandon_turn(self.epoch);
        }
    }
}

/// Use case for running one chat turn
pub struct RequestCoordinator<G: ChatGateway + 'static> {
    gateway: Arc<G>,
    store: SessionStore,
    timeout: RequestTimeout,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: ChatGateway + 'static> RequestCoordinator<G> {
    pub fn new(gateway: Arc<G>, store: SessionStore) -> Self {
        Self {
            gateway,
            store,
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

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Submit a user turn.
    ///
    /// Blank text and submissions while another turn is in flight are
    /// ignored. Otherwise the in-flight flag is set for exactly as long as
    /// the request is outstanding and is cleared on every exit path.
    pub async fn submit_turn(&self, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            debug!("Ignoring blank submission");
            return TurnOutcome::Rejected(RejectReason::Blank);
        }

        let Some(ticket) = self.store.begin_turn(Message::user(text)) else {
            debug!("Ignoring submission while a turn is in flight");
            return TurnOutcome::Rejected(RejectReason::Pending);
        };

        let guard = TurnGuard {
            store: &self.store,
            epoch: ticket.epoch,
            finished: false,
        };

        self.logger.log(ConversationEvent::new(
            "turn_submitted",
            json!({
                "epoch": ticket.epoch,
                "messages": ticket.transcript.len(),
                "text": text,
            }),
        ));
        debug!(
            epoch = ticket.epoch,
            messages = ticket.transcript.len(),
            "Dispatching chat request"
        );

        let (message, outcome) = match self.dispatch(&ticket.transcript).await {
            Ok(reply) => {
                info!(bytes = reply.len(), "Chat reply received");
                self.logger.log(ConversationEvent::new(
                    "turn_completed",
                    json!({ "epoch": ticket.epoch, "bytes": reply.len(), "reply": reply }),
                ));
                (Message::assistant(reply), TurnOutcome::Completed)
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                self.logger.log(ConversationEvent::new(
                    "turn_failed",
                    json!({ "epoch": ticket.epoch, "kind": e.kind(), "error": e.to_string() }),
                ));
                (Message::failure_sentinel(), TurnOutcome::Failed)
            }
        };

        if guard.finish(message) {
            outcome
        } else {
            debug!(epoch = ticket.epoch, "Session was reset mid-request; dropping result");
            TurnOutcome::Discarded
        }
    }

    async fn dispatch(&self, transcript: &[Message]) -> Result<String, GatewayError> {
        match self.timeout {
            RequestTimeout::Unbounded => self.gateway.send_chat(transcript).await,
            RequestTimeout::After(limit) => {
                tokio::time::timeout(limit, self.gateway.send_chat(transcript))
                    .await
                    .map_err(|_| GatewayError::Timeout)?
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    // ==================== Test Mocks ====================

    struct MockGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatGateway for MockGateway {
        async fn send_chat(&self, messages: &[Message]) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
        }
    }

    /// Holds every request until `release` is notified.
    struct GatedGateway {
        reply: String,
        started: Notify,
        release: Notify,
        calls: Mutex<usize>,
    }

    impl GatedGateway {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                started: Notify::new(),
                release: Notify::new(),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatGateway for GatedGateway {
        async fn send_chat(&self, _messages: &[Message]) -> Result<String, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            self.started.notify_one();
            self.release.notified().await;
            Ok(self.reply.clone())
        }
    }

    struct HangingGateway;

    #[async_trait]
    impl ChatGateway for HangingGateway {
        async fn send_chat(&self, _messages: &[Message]) -> Result<String, GatewayError> {
            std::future::pending().await
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_successful_turn_appends_in_order() {
        let gateway = Arc::new(MockGateway::new(vec![Ok("world".to_string())]));
        let store = SessionStore::new();
        let coordinator = RequestCoordinator::new(gateway.clone(), store.clone());

        let outcome = coordinator.submit_turn("hello").await;

        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(
            store.transcript(),
            vec![Message::user("hello"), Message::assistant("world")]
        );
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_request_carries_full_transcript() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok("first reply".to_string()),
            Ok("second reply".to_string()),
        ]));
        let store = SessionStore::new();
        let coordinator = RequestCoordinator::new(gateway.clone(), store.clone());

        coordinator.submit_turn("one").await;
        coordinator.submit_turn("two").await;

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], vec![Message::user("one")]);
        assert_eq!(
            calls[1],
            vec![
                Message::user("one"),
                Message::assistant("first reply"),
                Message::user("two"),
            ]
        );
    }

    #[tokio::test]
    async fn test_reply_is_kept_verbatim() {
        let reply = "  **bold**\n<b>markup</b>  ";
        let gateway = Arc::new(MockGateway::new(vec![Ok(reply.to_string())]));
        let store = SessionStore::new();
        let coordinator = RequestCoordinator::new(gateway, store.clone());

        coordinator.submit_turn(" hi ").await;

        let transcript = store.transcript();
        assert_eq!(transcript[0].content(), " hi ");
        assert_eq!(transcript[1].content(), reply);
    }

    #[tokio::test]
    async fn test_blank_input_is_a_no_op() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let store = SessionStore::new();
        let coordinator = RequestCoordinator::new(gateway.clone(), store.clone());

        for input in ["", "   ", "\n\t"] {
            assert_eq!(
                coordinator.submit_turn(input).await,
                TurnOutcome::Rejected(RejectReason::Blank)
            );
        }

        assert!(store.is_empty());
        assert!(!store.is_pending());
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_appends_sentinel_and_clears_pending() {
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::Connection(
            "refused".to_string(),
        ))]));
        let store = SessionStore::new();
        let coordinator = RequestCoordinator::new(gateway, store.clone());

        let outcome = coordinator.submit_turn("hi").await;

        assert_eq!(outcome, TurnOutcome::Failed);
        let transcript = store.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript[1].is_failure_sentinel());
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_second_submission_while_pending_is_ignored() {
        let gateway = Arc::new(GatedGateway::new("reply"));
        let store = SessionStore::new();
        let coordinator = Arc::new(RequestCoordinator::new(gateway.clone(), store.clone()));

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.submit_turn("first").await }
        });
        gateway.started.notified().await;
        assert!(store.is_pending());

        let second = coordinator.submit_turn("second").await;
        assert_eq!(second, TurnOutcome::Rejected(RejectReason::Pending));

        gateway.release.notify_one();
        assert_eq!(first.await.unwrap(), TurnOutcome::Completed);

        assert_eq!(*gateway.calls.lock().unwrap(), 1);
        assert_eq!(
            store.transcript(),
            vec![Message::user("first"), Message::assistant("reply")]
        );
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_reset_mid_request_discards_reply() {
        let gateway = Arc::new(GatedGateway::new("late reply"));
        let store = SessionStore::new();
        let coordinator = Arc::new(RequestCoordinator::new(gateway.clone(), store.clone()));

        let turn = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.submit_turn("hi").await }
        });
        gateway.started.notified().await;

        store.reset();
        gateway.release.notify_one();

        assert_eq!(turn.await.unwrap(), TurnOutcome::Discarded);
        assert!(store.is_empty());
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_dropped_turn_clears_pending() {
        let gateway = Arc::new(GatedGateway::new("never delivered"));
        let store = SessionStore::new();
        let coordinator = Arc::new(RequestCoordinator::new(gateway.clone(), store.clone()));

        let turn = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.submit_turn("hi").await }
        });
        gateway.started.notified().await;
        assert!(store.is_pending());

        turn.abort();
        assert!(turn.await.unwrap_err().is_cancelled());

        assert!(!store.is_pending());
        assert_eq!(store.transcript(), vec![Message::user("hi")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_turn() {
        let store = SessionStore::new();
        let coordinator = RequestCoordinator::new(Arc::new(HangingGateway), store.clone())
            .with_timeout(RequestTimeout::After(Duration::from_secs(5)));

        let outcome = coordinator.submit_turn("hello?").await;

        assert_eq!(outcome, TurnOutcome::Failed);
        assert!(store.transcript()[1].is_failure_sentinel());
        assert!(!store.is_pending());
    }

    #[tokio::test]
    async fn test_turn_events_are_logged() {
        #[derive(Default)]
        struct CollectingLogger(Mutex<Vec<&'static str>>);
        impl ConversationLogger for CollectingLogger {
            fn log(&self, event: ConversationEvent) {
                self.0.lock().unwrap().push(event.event_type);
            }
        }

        let logger = Arc::new(CollectingLogger::default());
        let gateway = Arc::new(MockGateway::new(vec![
            Ok("ok".to_string()),
            Err(GatewayError::Timeout),
        ]));
        let coordinator =
            RequestCoordinator::new(gateway, SessionStore::new()).with_logger(logger.clone());

        coordinator.submit_turn("a").await;
        coordinator.submit_turn("b").await;

        assert_eq!(
            *logger.0.lock().unwrap(),
            vec!["turn_submitted", "turn_completed", "turn_submitted", "turn_failed"]
        );
    }
}
