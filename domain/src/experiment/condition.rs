//! Condition identities and results - immutable outputs of one pipeline.

use crate::debate::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// The four canonical generation conditions (Value Object)
///
/// Every run executes exactly these four, in this canonical order. The order
/// shown to the reader is decided by the blinding permutation, never by this
/// enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionId {
    /// One plain call, question only
    SinglePlain,
    /// One call with a role-priming system prompt
    SinglePrimed,
    /// Debate between agents on different backends
    MixedDebate,
    /// Debate between differently-role-primed agents on one backend
    SameBackendDebate,
}

impl ConditionId {
    /// Canonical slot order
    pub const ALL: [ConditionId; 4] = [
        ConditionId::SinglePlain,
        ConditionId::SinglePrimed,
        ConditionId::MixedDebate,
        ConditionId::SameBackendDebate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionId::SinglePlain => "single-plain",
            ConditionId::SinglePrimed => "single-primed",
            ConditionId::MixedDebate => "mixed-debate",
            ConditionId::SameBackendDebate => "same-backend-debate",
        }
    }

    /// Human-readable label, used after reveal
    pub fn label(&self) -> &'static str {
        match self {
            ConditionId::SinglePlain => "Single call (plain)",
            ConditionId::SinglePrimed => "Single call (role-primed)",
            ConditionId::MixedDebate => "Debate (mixed backends)",
            ConditionId::SameBackendDebate => "Debate (single backend, multi-role)",
        }
    }
}

impl std::fmt::Display for ConditionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one condition pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionResult {
    pub condition: ConditionId,
    pub label: String,
    /// Final synthesized answer, or a failure notice
    pub answer: String,
    pub transcript: Transcript,
    /// Error description if the pipeline failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConditionResult {
    pub fn new(condition: ConditionId, answer: impl Into<String>, transcript: Transcript) -> Self {
        Self {
            condition,
            label: condition.label().to_string(),
            answer: answer.into(),
            transcript,
            error: None,
        }
    }

    /// Placeholder result for a failed pipeline: the slot stays occupied so
    /// one bad condition never hides the other three.
    pub fn failed(condition: ConditionId, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            condition,
            label: condition.label().to_string(),
            answer: format!("[failed] this condition did not produce an answer: {error}"),
            transcript: Transcript::new(),
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
