//! Conversation entities: messages and per-agent histories

use crate::debate::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a message in a conversation
///
/// Backends rename roles on the wire (Gemini calls the assistant "model");
/// that translation is an infrastructure concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Private conversation memory for every agent in one debate run (Entity)
///
/// Each agent id maps to an ordered, append-only message sequence. The
/// history is exclusively owned by one debate run; it grows monotonically
/// and is never truncated.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    entries: HashMap<AgentId, Vec<Message>>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an agent's history with its system rules message.
    ///
    /// Seeding twice is a no-op: an agent has exactly one history per debate.
    pub fn seed(&mut self, agent: AgentId, rules: impl Into<String>) {
        self.entries
            .entry(agent)
            .or_insert_with(|| vec![Message::system(rules)]);
    }

    /// Append a user turn to an agent's history
    pub fn push_user(&mut self, agent: &AgentId, content: impl Into<String>) {
        if let Some(messages) = self.entries.get_mut(agent) {
            messages.push(Message::user(content));
        }
    }

    /// Append an assistant turn to an agent's history
    pub fn push_assistant(&mut self, agent: &AgentId, content: impl Into<String>) {
        if let Some(messages) = self.entries.get_mut(agent) {
            messages.push(Message::assistant(content));
        }
    }

    /// Get an agent's full message sequence (empty if never seeded)
    pub fn messages(&self, agent: &AgentId) -> &[Message] {
        self.entries.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of agents with a seeded history
    pub fn agent_count(&self) -> usize {
        self.entries.len()
    }
}
