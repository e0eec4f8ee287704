//! Debate transcript value objects

use crate::core::provider::Provider;
use crate::debate::agent::AgentId;
use serde::{Deserialize, Serialize};

/// One agent utterance in a debate, immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Round number; synthesis is recorded at `rounds + 1`
    pub round: u32,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub provider: Provider,
    pub model: String,
    pub content: String,
}

/// Run-scoped transcript: turns appended in generation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// All turns produced in a given round, in generation order
    pub fn turns_in_round(&self, round: u32) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(move |t| t.round == round)
    }

    /// Highest round number recorded so far (0 when empty)
    pub fn last_round(&self) -> u32 {
        self.turns.iter().map(|t| t.round).max().unwrap_or(0)
    }

    /// Check that round numbers are contiguous integers starting at 1.
    pub fn rounds_are_contiguous(&self) -> bool {
        let last = self.last_round();
        (1..=last).all(|r| self.turns_in_round(r).next().is_some())
    }
}
