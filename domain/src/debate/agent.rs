//! Debate agent entity

use crate::core::provider::Provider;
use serde::{Deserialize, Serialize};

/// Identifier of an agent, unique within one debate (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A participant in a debate (Entity)
///
/// Immutable for the lifetime of the debate: the roster is fixed before the
/// first round and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique id within the debate
    pub id: AgentId,
    /// Display name used in transcripts and peer prompts
    pub name: String,
    /// Backend that serves this agent's calls
    pub provider: Provider,
    /// Preferred model id on that backend
    pub model: String,
    /// Persona text interpolated into the rules template
    pub persona: String,
    /// Whether this agent performs the final synthesis
    pub moderator: bool,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: Provider,
        model: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id: AgentId::new(id),
            name: name.into(),
            provider,
            model: model.into(),
            persona: persona.into(),
            moderator: false,
        }
    }

    /// Mark this agent as the debate's moderator
    pub fn as_moderator(mut self) -> Self {
        self.moderator = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_builder() {
        let agent = Agent::new(
            "skeptic",
            "Skeptic",
            Provider::OpenAi,
            "gpt-4o-mini",
            "You challenge every claim.",
        );
        assert_eq!(agent.id.as_str(), "skeptic");
        assert!(!agent.moderator);

        let moderator = agent.as_moderator();
        assert!(moderator.moderator);
    }
}
