//! Run aggregate: one submission's blinded result set.

use crate::core::question::Question;
use crate::debate::transcript::Transcript;
use crate::experiment::blinding::{BlindLabel, Blinding};
use crate::experiment::condition::{ConditionId, ConditionResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One condition's output as presented to the reader: provenance hidden
#[derive(Debug, Clone, Serialize)]
pub struct BlindedResponse {
    pub label: BlindLabel,
    pub answer: String,
    pub transcript: Transcript,
}

/// One experiment run (Aggregate)
///
/// Created once per submission and immutable thereafter. The label→condition
/// key is kept private: it is not serialized into the response payload and is
/// only readable through [`Run::reveal`].
#[derive(Debug, Clone, Serialize)]
pub struct Run {
    id: String,
    created_at: DateTime<Utc>,
    question: String,
    responses: Vec<BlindedResponse>,
    #[serde(skip)]
    key: Blinding,
}

impl Run {
    /// Assemble a run from the four condition results and a blinding drawn
    /// for this run.
    ///
    /// Responses are emitted in label order A..D; which condition lands under
    /// which label is decided entirely by the blinding permutation.
    pub fn assemble(question: Question, results: [ConditionResult; 4], key: Blinding) -> Self {
        let responses = BlindLabel::ALL
            .iter()
            .map(|label| {
                let condition = key.condition_for(*label);
                let source = results
                    .iter()
                    .find(|r| r.condition == condition)
                    .cloned()
                    .unwrap_or_else(|| ConditionResult::failed(condition, "result slot missing"));
                BlindedResponse {
                    label: *label,
                    answer: source.answer,
                    transcript: source.transcript,
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            question: question.into_content(),
            responses,
            key,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// The four blinded responses, in presented (label) order
    pub fn responses(&self) -> &[BlindedResponse] {
        &self.responses
    }

    /// Explicit reveal: which condition produced the response behind `label`
    pub fn reveal(&self, label: BlindLabel) -> ConditionId {
        self.key.condition_for(label)
    }
}
