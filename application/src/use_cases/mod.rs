//! Use cases (application services)
//!
//! - [`submit_turn`] — one request/response cycle against the chat endpoint
//! - [`submit_feedback`] — rate the session, submit it, start over

pub mod submit_feedback;
pub mod submit_turn;
