//! Application layer for empower-chat
//!
//! This crate contains the session store, use cases, port definitions and
//! application configuration. It depends only on the domain layer.
//!
//! Control flow of one turn:
//!
//! ```text
//! submit_turn(text)
//!   └─ SessionStore::begin_turn      append user message, set pending
//!        └─ ChatGateway::send_chat   full transcript, awaits reply
//!             └─ SessionStore::complete_turn   append reply/sentinel, clear pending
//!                  └─ TranscriptObserver::on_change   (e.g. scroll sync)
//! ```

pub mod config;
pub mod ports;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ClientConfig, RequestTimeout};
pub use ports::{
    chat_gateway::{ChatGateway, GatewayError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    review_gateway::{ReviewAck, ReviewGateway},
    transcript_observer::{ChangeKind, TranscriptChange, TranscriptObserver},
};
pub use store::session_store::{SessionStore, TurnTicket};
pub use use_cases::submit_feedback::{FeedbackController, FeedbackOutcome, FeedbackPrompt};
pub use use_cases::submit_turn::{RejectReason, RequestCoordinator, TurnOutcome};
