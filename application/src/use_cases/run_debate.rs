//! Run Debate use case
//!
//! Drives one multi-round multi-agent debate to a synthesized answer.
//! State machine: Round(1..R) → Synthesis → Done.

use crate::ports::model_gateway::{CallParams, ModelGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::transcript_logger::{NoTranscriptLog, TranscriptEvent, TranscriptLogger};
use crate::use_cases::shared::ConditionError;
use arena_domain::{
    Agent, ConditionId, ConversationHistory, DomainError, PromptKind, PromptTemplate, Question,
    Transcript, Turn,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// The debate's answer together with its full transcript
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub answer: String,
    pub transcript: Transcript,
}

/// Use case for running one debate
pub struct RunDebateUseCase<G: ModelGateway> {
    gateway: Arc<G>,
    progress: Arc<dyn ProgressNotifier>,
    logger: Arc<dyn TranscriptLogger>,
}

impl<G: ModelGateway> Clone for RunDebateUseCase<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            progress: Arc::clone(&self.progress),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<G: ModelGateway> RunDebateUseCase<G> {
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

    /// Execute a debate over `roster` for `rounds` rounds plus synthesis.
    ///
    /// Agents run strictly one after another, and round r completes fully
    /// before round r+1 starts: the next round's prompts are a function of
    /// this round's complete output.
    pub async fn execute(
        &self,
        condition: ConditionId,
        question: &Question,
        roster: &[Agent],
        rounds: u32,
        params: &CallParams,
    ) -> Result<DebateOutcome, ConditionError> {
        if roster.is_empty() {
            return Err(ConditionError::Domain(DomainError::EmptyRoster));
        }

        info!(
            condition = %condition,
            agents = roster.len(),
            rounds,
            "Starting debate"
        );

        let mut history = ConversationHistory::new();
        for agent in roster {
            history.seed(agent.id.clone(), PromptTemplate::debate_rules(&agent.persona));
        }

        let mut transcript = Transcript::new();

        for round in 1..=rounds {
            self.progress.on_round_start(&condition, round, rounds);

            for agent in roster {
                let prompt = match PromptKind::for_round(round) {
                    PromptKind::Opening => PromptTemplate::opening(question.content()),
                    _ => {
                        let peers: Vec<(String, String)> = transcript
                            .turns_in_round(round - 1)
                            .filter(|t| t.agent_id != agent.id)
                            .map(|t| (t.agent_name.clone(), t.content.clone()))
                            .collect();
                        PromptTemplate::rebuttal(round, &peers)
                    }
                };

                let content = self.take_turn(condition, agent, round, prompt, &mut history, params).await?;

                transcript.record(Turn {
                    round,
                    agent_id: agent.id.clone(),
                    agent_name: agent.name.clone(),
                    provider: agent.provider,
                    model: agent.model.clone(),
                    content,
                });
            }
        }

        // Synthesis: moderator-flagged agent, else the first
        let moderator = roster.iter().find(|a| a.moderator).unwrap_or(&roster[0]);
        let prompt = PromptTemplate::synthesis(question.content(), &transcript);
        let synthesis_round = rounds + 1;

        let answer = self
            .take_turn(condition, moderator, synthesis_round, prompt, &mut history, params)
            .await?;

        transcript.record(Turn {
            round: synthesis_round,
            agent_id: moderator.id.clone(),
            agent_name: moderator.name.clone(),
            provider: moderator.provider,
            model: moderator.model.clone(),
            content: answer.clone(),
        });

        info!(condition = %condition, turns = transcript.len(), "Debate complete");

        Ok(DebateOutcome { answer, transcript })
    }

    /// One agent call: prompt appended as a user turn on the agent's own
    /// history, reply appended as an assistant turn.
    async fn take_turn(
        &self,
        condition: ConditionId,
        agent: &Agent,
        round: u32,
        prompt: String,
        history: &mut ConversationHistory,
        params: &CallParams,
    ) -> Result<String, ConditionError> {
        history.push_user(&agent.id, prompt);

        let reply = match self
            .gateway
            .generate(agent.provider, &agent.model, history.messages(&agent.id), params)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                self.progress.on_turn_complete(&condition, &agent.name, false);
                return Err(e.into());
            }
        };

        history.push_assistant(&agent.id, reply.clone());

        debug!(
            condition = %condition,
            agent = %agent.name,
            round,
            bytes = reply.len(),
            "Turn recorded"
        );
        self.logger.log(TranscriptEvent::new(
            "turn",
            json!({
                "condition": condition.as_str(),
                "round": round,
                "agent": agent.name,
                "provider": agent.provider.as_str(),
                "model": agent.model,
                "text": reply.clone(),
            }),
        ));
        self.progress.on_turn_complete(&condition, &agent.name, true);

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_gateway::GatewayError;
    use arena_domain::{Message, Provider, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordedCall {
        model: String,
        messages: Vec<Message>,
    }

    /// Mock gateway: records every call and replies `reply-<n>`.
    struct MockGateway {
        calls: Mutex<Vec<RecordedCall>>,
        fail_model: Option<String>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_model: None,
            }
        }

        fn failing_for(model: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_model: Some(model.to_string()),
            }
        }

        fn calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
            self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ModelGateway for MockGateway {
        async fn generate(
            &self,
            _provider: Provider,
            model: &str,
            messages: &[Message],
            _params: &CallParams,
        ) -> Result<String, GatewayError> {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.len();
            calls.push(RecordedCall {
                model: model.to_string(),
                messages: messages.to_vec(),
            });
            if self.fail_model.as_deref() == Some(model) {
                return Err(GatewayError::Upstream {
                    provider: Provider::Gemini,
                    status: 500,
                    message: "mock failure".to_string(),
                });
            }
            Ok(format!("reply-{n}"))
        }
    }

    fn roster() -> Vec<Agent> {
        vec![
            Agent::new("alpha", "Alpha", Provider::Gemini, "model-a", "persona a"),
            Agent::new("beta", "Beta", Provider::OpenAi, "model-b", "persona b").as_moderator(),
        ]
    }

    fn question() -> Question {
        Question::new("Is water wet?").unwrap()
    }

    #[tokio::test]
    async fn debate_produces_rounds_times_agents_plus_synthesis() {
        let gateway = Arc::new(MockGateway::new());
        let debate = RunDebateUseCase::new(Arc::clone(&gateway));

        let outcome = debate
            .execute(
                ConditionId::MixedDebate,
                &question(),
                &roster(),
                2,
                &CallParams::default(),
            )
            .await
            .unwrap();

        // 2 rounds x 2 agents + 1 synthesis
        assert_eq!(outcome.transcript.len(), 5);
        let rounds: Vec<u32> = outcome.transcript.turns().iter().map(|t| t.round).collect();
        assert_eq!(rounds, vec![1, 1, 2, 2, 3]);
        assert!(outcome.transcript.rounds_are_contiguous());
    }

    #[tokio::test]
    async fn synthesis_is_spoken_by_the_moderator() {
        let gateway = Arc::new(MockGateway::new());
        let debate = RunDebateUseCase::new(Arc::clone(&gateway));

        let outcome = debate
            .execute(
                ConditionId::MixedDebate,
                &question(),
                &roster(),
                1,
                &CallParams::default(),
            )
            .await
            .unwrap();

        let last = outcome.transcript.turns().last().unwrap();
        assert_eq!(last.agent_name, "Beta");
        assert_eq!(last.round, 2);
        assert_eq!(last.content, outcome.answer);
    }

    #[tokio::test]
    async fn moderator_defaults_to_first_agent() {
        let gateway = Arc::new(MockGateway::new());
        let debate = RunDebateUseCase::new(Arc::clone(&gateway));
        let unflagged: Vec<Agent> = roster()
            .into_iter()
            .map(|mut a| {
                a.moderator = false;
                a
            })
            .collect();

        let outcome = debate
            .execute(
                ConditionId::SameBackendDebate,
                &question(),
                &unflagged,
                1,
                &CallParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.transcript.turns().last().unwrap().agent_name, "Alpha");
    }

    #[tokio::test]
    async fn rebuttal_prompt_quotes_peers_but_never_self() {
        let gateway = Arc::new(MockGateway::new());
        let debate = RunDebateUseCase::new(Arc::clone(&gateway));

        debate
            .execute(
                ConditionId::MixedDebate,
                &question(),
                &roster(),
                2,
                &CallParams::default(),
            )
            .await
            .unwrap();

        let calls = gateway.calls();
        // Call order: r1 Alpha (reply-0), r1 Beta (reply-1),
        //             r2 Alpha (call 2), r2 Beta (call 3), synthesis (call 4)
        let alpha_r2_prompt = &calls[2].messages.last().unwrap().content;
        assert!(alpha_r2_prompt.contains("reply-1"));
        assert!(!alpha_r2_prompt.contains("reply-0"));
        assert!(alpha_r2_prompt.contains("--- Beta ---"));

        let beta_r2_prompt = &calls[3].messages.last().unwrap().content;
        assert!(beta_r2_prompt.contains("reply-0"));
        assert!(!beta_r2_prompt.contains("reply-1"));
    }

    #[tokio::test]
    async fn each_agent_keeps_a_private_seeded_history() {
        let gateway = Arc::new(MockGateway::new());
        let debate = RunDebateUseCase::new(Arc::clone(&gateway));

        debate
            .execute(
                ConditionId::MixedDebate,
                &question(),
                &roster(),
                2,
                &CallParams::default(),
            )
            .await
            .unwrap();

        let calls = gateway.calls();
        // Alpha's round-2 call sees: rules, opening prompt, own reply, rebuttal prompt
        let alpha_r2 = &calls[2];
        assert_eq!(alpha_r2.model, "model-a");
        let roles: Vec<Role> = alpha_r2.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert!(alpha_r2.messages[0].content.contains("persona a"));
        // Beta's replies never leak into Alpha's history
        assert!(
            alpha_r2
                .messages
                .iter()
                .filter(|m| m.role == Role::Assistant)
                .all(|m| m.content == "reply-0")
        );
    }

    #[tokio::test]
    async fn synthesis_prompt_digests_the_whole_transcript() {
        let gateway = Arc::new(MockGateway::new());
        let debate = RunDebateUseCase::new(Arc::clone(&gateway));

        debate
            .execute(
                ConditionId::MixedDebate,
                &question(),
                &roster(),
                2,
                &CallParams::default(),
            )
            .await
            .unwrap();

        let calls = gateway.calls();
        let synthesis_prompt = &calls[4].messages.last().unwrap().content;
        assert!(synthesis_prompt.contains("[round 1] Alpha:"));
        assert!(synthesis_prompt.contains("[round 2] Beta:"));
        assert!(synthesis_prompt.contains("FINAL ANSWER:"));
    }

    #[tokio::test]
    async fn empty_roster_is_rejected() {
        let gateway = Arc::new(MockGateway::new());
        let debate = RunDebateUseCase::new(gateway);

        let result = debate
            .execute(
                ConditionId::MixedDebate,
                &question(),
                &[],
                2,
                &CallParams::default(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ConditionError::Domain(DomainError::EmptyRoster))
        ));
    }

    #[tokio::test]
    async fn gateway_errors_propagate_uncaught() {
        let gateway = Arc::new(MockGateway::failing_for("model-b"));
        let debate = RunDebateUseCase::new(gateway);

        let result = debate
            .execute(
                ConditionId::MixedDebate,
                &question(),
                &roster(),
                1,
                &CallParams::default(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ConditionError::Gateway(GatewayError::Upstream { .. }))
        ));
    }
}
