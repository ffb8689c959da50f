//! Chat session domain.
//!
//! - [`entities::Session`] — the transcript plus the in-flight flag
//! - [`entities::Message`] — a single entry within the transcript

pub mod entities;
