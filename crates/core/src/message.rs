//! Turn and History domain types.
//!
//! These are the core value objects that flow through the system:
//! user submits a query → gateway assembles a message list → provider
//! generates a response → the exchange is appended to the session history.
//!
//! A [`Turn`] serializes exactly as `{"role": ..., "content": ...}` — this
//! is both the wire format of the `conversation_history` field returned to
//! clients and the message format sent to the upstream completion API.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (persona, grounding rules)
    System,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who sent this turn
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Turn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// An ordered sequence of turns belonging to one session.
///
/// The full history persists for the session lifetime; only the most
/// recent suffix ([`History::tail`]) is forwarded upstream when building
/// a completion request. Turns are strictly chronological; alternation
/// is not enforced by the type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn followed by the resulting assistant turn.
    ///
    /// Callers must only invoke this after a successful upstream response
    /// so that a failed exchange leaves no orphaned user turn behind.
    pub fn append_exchange(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.turns.push(Turn::user(user_text));
        self.turns.push(Turn::assistant(assistant_text));
    }

    /// The most recent `max_turns` turns, in chronological order.
    ///
    /// Does not mutate the stored history. Returns everything when the
    /// history is shorter than the window.
    pub fn tail(&self, max_turns: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(max_turns);
        &self.turns[start..]
    }

    /// Replace the history with an empty sequence.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of stored turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history holds no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
