//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid rating: {0} (expected \"good\" or \"bad\")")]
    InvalidRating(String),

    #[error("Invalid role: {0} (expected \"user\" or \"assistant\")")]
    InvalidRole(String),
}
