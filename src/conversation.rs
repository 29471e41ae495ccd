//! Conversation state — ordered transcripts of turns.
//!
//! A transcript is the context sent to the model on every call. Turns are
//! only ever appended; a transcript is replaced wholesale by `reset` at the
//! start of each top-level action.

use serde_json::Value;

use crate::llm::types::{ChatMessage, Role};

/// One message in a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    role: Role,
    content: String,
    reasoning: Option<Value>,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            reasoning: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            reasoning: None,
        }
    }

    /// An assistant reply with the model's opaque reasoning trace attached.
    pub fn assistant(content: impl Into<String>, reasoning: Option<Value>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            reasoning,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Reasoning metadata, for display only. Never sent back to the model.
    pub fn reasoning(&self) -> Option<&Value> {
        self.reasoning.as_ref()
    }

    fn to_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

/// Ordered sequence of turns.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole transcript with a system prompt and a first user turn.
    pub fn reset(&mut self, system: impl Into<String>, first_user: impl Into<String>) {
        self.turns.clear();
        self.turns.push(Turn::system(system));
        self.turns.push(Turn::user(first_user));
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns with the given role.
    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    /// The wire view: role and content only, reasoning stripped.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        self.turns.iter().map(Turn::to_message).collect()
    }
}
