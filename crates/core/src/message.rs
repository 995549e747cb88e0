//! Message and transcript domain types.
//!
//! These are the value objects that flow through the whole system:
//! the gateway accepts a user message, the agent threads it into the
//! right conversation, and the store replays prior turns by thread id.

use chrono::{DateTime, Utc};
use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier naming a conversation thread.
///
/// The same value is bound to both identity roles the conversation store
/// expects: the "resource" (the long-lived entity the conversation belongs
/// to) and the "thread" (the specific conversation stream). This service
/// does not support a resource owning multiple independent threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    /// Mint a fresh identifier: millisecond wall-clock timestamp plus a
    /// random alphanumeric suffix.
    ///
    /// The timestamp gives chronological ordering and debuggability; the
    /// random suffix keeps two mints in the same millisecond apart.
    /// Uniqueness is best-effort — collisions are statistically negligible
    /// at this service's call volume, but there is no formal guarantee and
    /// no collision check.
    pub fn mint() -> Self {
        let suffix = Alphanumeric.sample_string(&mut rand::rng(), 8);
        Self(format!("{}-{}", Utc::now().timestamp_millis(), suffix))
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender within a conversation transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (the role-conditioned persona)
    System,
}

/// A single message in a conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: ChatRole,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(ChatRole::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(ChatRole::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(ChatRole::System, content)
    }

    fn with_role(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An ordered sequence of messages belonging to one thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    /// Ordered messages, oldest first
    pub messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
