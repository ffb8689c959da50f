//! Feedback domain entities

use crate::core::error::DomainError;
use crate::session::entities::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User verdict on a finished conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Bad,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::Bad => "bad",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "good" => Ok(Rating::Good),
            "bad" => Ok(Rating::Bad),
            _ => Err(DomainError::InvalidRating(s.to_string())),
        }
    }
}

/// A rating together with the transcript it rates (Value Object)
///
/// Serializes to the review endpoint's wire shape:
/// `{ "rating": "good", "messages": [...], "feedback": "..." }` where
/// `feedback` is present only when a comment was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub rating: Rating,
    #[serde(rename = "messages")]
    pub transcript: Vec<Message>,
    #[serde(
        rename = "feedback",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub comment: Option<String>,
}

impl FeedbackRecord {
    pub fn new(rating: Rating, transcript: Vec<Message>) -> Self {
        Self {
            rating,
            transcript,
            comment: None,
        }
    }

    /// Attach a free-text comment. Blank comments are dropped.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = if comment.trim().is_empty() {
            None
        } else {
            Some(comment)
        };
        self
    }
}
