//! Session feedback domain.
//!
//! - [`entities::Rating`] — good/bad verdict on a conversation
//! - [`entities::FeedbackRecord`] — rating plus transcript snapshot

pub mod entities;
