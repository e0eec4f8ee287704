//! Run Experiment use case
//!
//! Fans out the four condition pipelines for one question, isolates their
//! failures, and assembles the blinded, order-randomized [`Run`].

use crate::config::{ConditionPlan, ExecutionParams, RunMode};
use crate::ports::model_gateway::{CallParams, ModelGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::transcript_logger::{NoTranscriptLog, TranscriptEvent, TranscriptLogger};
use crate::use_cases::run_condition::RunConditionUseCase;
use crate::use_cases::shared::ConditionError;
use arena_domain::{Blinding, ConditionId, ConditionResult, Question, Run};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Input for one experiment run
#[derive(Debug, Clone)]
pub struct ExperimentInput {
    pub question: Question,
    /// Plans for the four canonical conditions
    pub plans: [ConditionPlan; 4],
    pub params: ExecutionParams,
}

impl ExperimentInput {
    pub fn new(question: Question, plans: [ConditionPlan; 4], params: ExecutionParams) -> Self {
        Self {
            question,
            plans,
            params,
        }
    }
}

/// Use case coordinating one full experiment run
pub struct RunExperimentUseCase<G: ModelGateway + 'static> {
    runner: RunConditionUseCase<G>,
    progress: Arc<dyn ProgressNotifier>,
    logger: Arc<dyn TranscriptLogger>,
}

impl<G: ModelGateway + 'static> RunExperimentUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            runner: RunConditionUseCase::new(gateway),
            progress: Arc::new(NoProgress),
            logger: Arc::new(NoTranscriptLog),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.runner = self.runner.clone().with_progress(Arc::clone(&progress));
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.runner = self.runner.clone().with_logger(Arc::clone(&logger));
        self.logger = logger;
        self
    }

    /// Execute all four conditions and return the blinded run.
    ///
    /// Never fails as a whole: a failing condition occupies its slot with a
    /// visible placeholder result instead of aborting its siblings.
    pub async fn execute(&self, input: ExperimentInput) -> Run {
        let call_params = input.params.call_params();
        info!(
            mode = input.params.mode.as_str(),
            rounds = input.params.rounds,
            "Starting experiment run"
        );

        let results = match input.params.mode {
            RunMode::Serial => {
                self.run_serial(&input.plans, &input.question, &call_params)
                    .await
            }
            RunMode::Concurrent => {
                self.run_concurrent(input.plans.clone(), input.question.clone(), call_params)
                    .await
            }
        };

        // Reassemble in canonical slot order before blinding
        let ordered: [ConditionResult; 4] = ConditionId::ALL.map(|id| {
            results
                .iter()
                .find(|r| r.condition == id)
                .cloned()
                .unwrap_or_else(|| ConditionResult::failed(id, "condition never settled"))
        });

        let blinding = Blinding::random(&mut rand::rng());
        let run = Run::assemble(input.question, ordered, blinding);

        self.logger.log(TranscriptEvent::new(
            "run_assembled",
            json!({
                "run_id": run.id(),
                "question": run.question(),
                "responses": run.responses().len(),
            }),
        ));
        info!(run_id = %run.id(), "Experiment run assembled");

        run
    }

    async fn run_serial(
        &self,
        plans: &[ConditionPlan; 4],
        question: &Question,
        params: &CallParams,
    ) -> Vec<ConditionResult> {
        let mut results = Vec::with_capacity(plans.len());
        for plan in plans {
            let outcome = self.runner.run(plan, question, params).await;
            results.push(self.settle(plan.id, outcome));
        }
        results
    }

    async fn run_concurrent(
        &self,
        plans: [ConditionPlan; 4],
        question: Question,
        params: CallParams,
    ) -> Vec<ConditionResult> {
        let mut join_set = JoinSet::new();

        for plan in plans {
            let runner = self.runner.clone();
            let question = question.clone();
            join_set.spawn(async move {
                let id = plan.id;
                let outcome = runner.run(&plan, &question, &params).await;
                (id, outcome)
            });
        }

        let mut results = Vec::with_capacity(4);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, outcome)) => results.push(self.settle(id, outcome)),
                Err(e) => {
                    // The slot is backfilled with a placeholder during reassembly
                    warn!("Condition task join error: {e}");
                }
            }
        }
        results
    }

    /// Convert a settled pipeline outcome into its result slot; failures
    /// become visible placeholders, never aborts.
    fn settle(
        &self,
        id: ConditionId,
        outcome: Result<ConditionResult, ConditionError>,
    ) -> ConditionResult {
        match outcome {
            Ok(result) => {
                self.progress.on_condition_complete(&id, true);
                result
            }
            Err(e) => {
                warn!(condition = %id, error = %e, "Condition failed; substituting placeholder");
                self.logger.log(TranscriptEvent::new(
                    "condition_failed",
                    json!({ "condition": id.as_str(), "error": e.to_string() }),
                ));
                self.progress.on_condition_complete(&id, false);
                ConditionResult::failed(id, e.to_string())
            }
        }
    }
}
