//! Core domain building blocks shared across modules.

pub mod error;
