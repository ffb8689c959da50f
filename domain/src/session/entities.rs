//! Session domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assistant content substituted when a chat request could not be completed.
pub const FAILURE_SENTINEL: &str = "⚠️ Error getting response";

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// A message in a conversation (Entity)
///
/// Immutable once created: fields are private and there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// The assistant entry recorded in place of a reply when a request fails.
    pub fn failure_sentinel() -> Self {
        Self::assistant(FAILURE_SENTINEL)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_failure_sentinel(&self) -> bool {
        self.role == Role::Assistant && self.content == FAILURE_SENTINEL
    }
}

/// A chat session (Entity)
///
/// Holds the ordered transcript and the in-flight flag. A session always
/// starts empty and lives only in process memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    transcript: Vec<Message>,
    pending: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Append to the end of the transcript. Role order is not enforced.
    pub fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    /// Drop the transcript and clear the in-flight flag.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.pending = false;
    }
}
