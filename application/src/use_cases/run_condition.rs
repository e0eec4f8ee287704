//! Run Condition use case
//!
//! Wraps a single-call or debate-backed flow into the uniform
//! [`ConditionResult`] shape. Errors are not caught here; they propagate to
//! the coordinator.

use crate::config::{ConditionFlow, ConditionPlan};
use crate::ports::model_gateway::{CallParams, ModelGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::transcript_logger::{NoTranscriptLog, TranscriptEvent, TranscriptLogger};
use crate::use_cases::run_debate::RunDebateUseCase;
use crate::use_cases::shared::ConditionError;
use arena_domain::{
    AgentId, ConditionId, ConditionResult, Message, Provider, Question, Transcript, Turn,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Use case for executing one condition pipeline
pub struct RunConditionUseCase<G: ModelGateway> {
    gateway: Arc<G>,
    progress: Arc<dyn ProgressNotifier>,
    logger: Arc<dyn TranscriptLogger>,
}

impl<G: ModelGateway> Clone for RunConditionUseCase<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            progress: Arc::clone(&self.progress),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<G: ModelGateway> RunConditionUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            progress: Arc::new(NoProgress),
            logger: Arc::new(NoTranscriptLog),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn run(
        &self,
        plan: &ConditionPlan,
        question: &Question,
        params: &CallParams,
    ) -> Result<ConditionResult, ConditionError> {
        self.progress.on_condition_start(&plan.id);

        match &plan.flow {
            ConditionFlow::SingleCall {
                provider,
                model,
                system,
            } => {
                self.run_single(plan.id, *provider, model, system.as_deref(), question, params)
                    .await
            }
            ConditionFlow::Debate { roster, rounds } => {
                let debate = RunDebateUseCase::new(Arc::clone(&self.gateway))
                    .with_progress(Arc::clone(&self.progress))
                    .with_logger(Arc::clone(&self.logger));
                let outcome = debate
                    .execute(plan.id, question, roster, *rounds, params)
                    .await?;
                Ok(ConditionResult::new(plan.id, outcome.answer, outcome.transcript))
            }
        }
    }

    /// One system/user exchange with fixed parameters and one synthetic
    /// transcript turn.
    async fn run_single(
        &self,
        condition: ConditionId,
        provider: Provider,
        model: &str,
        system: Option<&str>,
        question: &Question,
        params: &CallParams,
    ) -> Result<ConditionResult, ConditionError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(question.content()));

        let answer = match self.gateway.generate(provider, model, &messages, params).await {
            Ok(answer) => answer,
            Err(e) => {
                self.progress.on_turn_complete(&condition, "solo", false);
                return Err(e.into());
            }
        };

        debug!(condition = %condition, provider = %provider, model, "Single call complete");
        self.logger.log(TranscriptEvent::new(
            "single_call",
            json!({
                "condition": condition.as_str(),
                "provider": provider.as_str(),
                "model": model,
                "text": answer.clone(),
            }),
        ));
        self.progress.on_turn_complete(&condition, "solo", true);

        let mut transcript = Transcript::new();
        transcript.record(Turn {
            round: 1,
            agent_id: AgentId::new("solo"),
            agent_name: "Solo".to_string(),
            provider,
            model: model.to_string(),
            content: answer.clone(),
        });

        Ok(ConditionResult::new(condition, answer, transcript))
    }
}
