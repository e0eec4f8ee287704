//! Randomized blinding: provenance-hidden ordering of condition results.

use crate::core::error::DomainError;
use crate::experiment::condition::ConditionId;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// The fixed set of opaque labels shown to the reader (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlindLabel {
    A,
    B,
    C,
    D,
}

impl BlindLabel {
    pub const ALL: [BlindLabel; 4] = [BlindLabel::A, BlindLabel::B, BlindLabel::C, BlindLabel::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlindLabel::A => "A",
            BlindLabel::B => "B",
            BlindLabel::C => "C",
            BlindLabel::D => "D",
        }
    }
}

impl std::fmt::Display for BlindLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Response {}", self.as_str())
    }
}

/// One run's label assignment: a permutation of the four conditions plus its
/// reverse lookup, generated once and owned by the [`Run`](crate::Run).
///
/// Regenerating the permutation lazily would make reveal inconsistent, so the
/// structure is built exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blinding {
    /// `order[i]` is the condition presented under `BlindLabel::ALL[i]`
    order: [ConditionId; 4],
}

impl Blinding {
    /// Draw a uniformly random permutation (all 4! orderings equally likely)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut order = ConditionId::ALL;
        order.shuffle(rng);
        Self { order }
    }

    /// Build from an explicit order; rejects duplicate conditions
    pub fn from_order(order: [ConditionId; 4]) -> Result<Self, DomainError> {
        for id in ConditionId::ALL {
            if !order.contains(&id) {
                return Err(DomainError::InvalidBlindOrder);
            }
        }
        Ok(Self { order })
    }

    /// Condition hidden behind a label
    pub fn condition_for(&self, label: BlindLabel) -> ConditionId {
        let idx = BlindLabel::ALL.iter().position(|l| *l == label);
        // ALL covers every label variant
        self.order[idx.unwrap_or(0)]
    }

    /// Reverse lookup: label assigned to a condition
    pub fn label_for(&self, condition: ConditionId) -> BlindLabel {
        let idx = self.order.iter().position(|c| *c == condition);
        BlindLabel::ALL[idx.unwrap_or(0)]
    }

    /// Presented order of conditions, one per label slot A..D
    pub fn order(&self) -> &[ConditionId; 4] {
        &self.order
    }
}
