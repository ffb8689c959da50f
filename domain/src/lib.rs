//! Domain layer for empower-chat
//!
//! This crate contains the core entities and value objects of a chat
//! session. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Transcript
//!
//! The ordered sequence of [`Message`]s forming one conversation. Insertion
//! order is conversation order; entries are never reordered, deduplicated
//! or edited after they are appended.
//!
//! ## Session
//!
//! A [`Session`] is the transcript plus the in-flight flag that gates new
//! user turns while a request is outstanding.
//!
//! ## Feedback
//!
//! A [`FeedbackRecord`] pairs a [`Rating`] with a snapshot of the transcript
//! at the moment the user rated the conversation.

pub mod core;
pub mod feedback;
pub mod session;

// Re-export commonly used types
pub use core::error::DomainError;
pub use feedback::entities::{FeedbackRecord, Rating};
pub use session::entities::{FAILURE_SENTINEL, Message, Role, Session};
