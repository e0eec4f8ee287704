//! Quota-aware backend adapter
//!
//! Wraps one backend's gateway calls with FIFO serialization, pre-call
//! spacing, hint-aware retry, and model fallback. Callers see the plain
//! gateway contract plus a fallback list; never the retry policy.

use crate::quota::queue::CallQueue;
use arena_application::{CallParams, GatewayError, ModelGateway};
use arena_domain::{Message, Provider};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry behavior for one backend
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per model candidate before giving up
    pub max_attempts: u32,
    /// Minimum spacing between any two calls to the backend; also the floor
    /// for every retry delay
    pub min_spacing: Duration,
    /// First backoff delay when the server sent no retry hint; doubles per
    /// attempt
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            min_spacing: Duration::from_millis(1500),
            base_backoff: Duration::from_secs(2),
        }
    }
}

enum CandidateOutcome {
    Success(String),
    /// Advance to the next candidate
    NotFound(GatewayError),
    /// Abort the whole call
    Abort(GatewayError),
}

/// One backend's quota-aware call surface
pub struct QuotaAwareBackend<G> {
    provider: Provider,
    gateway: Arc<G>,
    queue: CallQueue,
    policy: RetryPolicy,
}

impl<G: ModelGateway> QuotaAwareBackend<G> {
    pub fn new(provider: Provider, gateway: Arc<G>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            gateway,
            queue: CallQueue::new(policy.min_spacing),
            policy,
        }
    }

    /// Same contract as the gateway, plus an ordered fallback list.
    ///
    /// The whole call — every attempt and every candidate — occupies one
    /// queue slot, so calls from other pipelines wait until this one settles.
    pub async fn call(
        &self,
        model: &str,
        fallbacks: &[String],
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError> {
        self.queue
            .run(|| self.try_candidates(model, fallbacks, messages, params))
            .await
    }

    async fn try_candidates(
        &self,
        model: &str,
        fallbacks: &[String],
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError> {
        // First retryable failure seen on any attempt; reported as the cause
        // when every candidate turns out to be unavailable.
        let mut retryable_cause: Option<GatewayError> = None;
        let mut last_not_found: Option<GatewayError> = None;

        for candidate in std::iter::once(model).chain(fallbacks.iter().map(String::as_str)) {
            match self
                .try_candidate(candidate, messages, params, &mut retryable_cause)
                .await
            {
                CandidateOutcome::Success(text) => return Ok(text),
                CandidateOutcome::NotFound(e) => {
                    debug!(provider = %self.provider, model = candidate, "Advancing past unknown model");
                    last_not_found = Some(e);
                }
                CandidateOutcome::Abort(e) => return Err(e),
            }
        }

        let cause = retryable_cause
            .or(last_not_found)
            .unwrap_or_else(|| GatewayError::ModelNotFound {
                provider: self.provider,
                model: model.to_string(),
            });
        Err(GatewayError::AllModelsUnavailable {
            provider: self.provider,
            cause: Box::new(cause),
        })
    }

    /// Retry loop for one candidate; attempt counting resets per candidate.
    ///
    /// Retry delay is the server hint (floored at the minimum spacing) when
    /// one exists, else exponential backoff. Model-not-found advances the
    /// candidate; quota failures never do.
    async fn try_candidate(
        &self,
        model: &str,
        messages: &[Message],
        params: &CallParams,
        retryable_cause: &mut Option<GatewayError>,
    ) -> CandidateOutcome {
        let mut backoff = self.policy.base_backoff.max(self.policy.min_spacing);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self
                .gateway
                .generate(self.provider, model, messages, params)
                .await
            {
                Ok(text) => return CandidateOutcome::Success(text),
                Err(e @ GatewayError::ModelNotFound { .. }) => {
                    warn!(provider = %self.provider, model, "Model not found");
                    return CandidateOutcome::NotFound(e);
                }
                Err(e) if e.is_retryable() => {
                    if attempt >= self.policy.max_attempts {
                        return CandidateOutcome::Abort(GatewayError::RetriesExhausted {
                            provider: self.provider,
                            attempts: attempt,
                            cause: Box::new(e),
                        });
                    }
                    let delay = match e.retry_hint() {
                        Some(hint) => hint.max(self.policy.min_spacing),
                        None => backoff,
                    };
                    warn!(
                        provider = %self.provider,
                        model,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retryable backend failure; backing off"
                    );
                    if retryable_cause.is_none() {
                        *retryable_cause = Some(e);
                    }
                    sleep(delay).await;
                    backoff = (backoff * 2).min(Duration::from_secs(60));
                }
                Err(e) => return CandidateOutcome::Abort(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Scripted gateway: pops one outcome per call and records when each
    /// call fired and for which model.
    struct ScriptedGateway {
        script: Mutex<VecDeque<Result<String, GatewayError>>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedGateway {
        fn new(script: Vec<Result<String, GatewayError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn models_called(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn generate(
            &self,
            _provider: Provider,
            model: &str,
            _messages: &[Message],
            _params: &CallParams,
        ) -> Result<String, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), Instant::now()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok("unscripted".to_string()))
        }
    }

    fn rate_limited(hint_secs: Option<u64>) -> GatewayError {
        GatewayError::RateLimited {
            provider: Provider::Gemini,
            retry_after: hint_secs.map(Duration::from_secs),
        }
    }

    fn not_found(model: &str) -> GatewayError {
        GatewayError::ModelNotFound {
            provider: Provider::Gemini,
            model: model.to_string(),
        }
    }

    fn server_error() -> GatewayError {
        GatewayError::Upstream {
            provider: Provider::Gemini,
            status: 503,
            message: "overloaded".to_string(),
        }
    }

    fn policy(max_attempts: u32, spacing_ms: u64, backoff_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            min_spacing: Duration::from_millis(spacing_ms),
            base_backoff: Duration::from_millis(backoff_ms),
        }
    }

    fn backend(
        gateway: &Arc<ScriptedGateway>,
        policy: RetryPolicy,
    ) -> QuotaAwareBackend<ScriptedGateway> {
        QuotaAwareBackend::new(Provider::Gemini, Arc::clone(gateway), policy)
    }

    fn messages() -> Vec<Message> {
        vec![Message::user("q")]
    }

    #[tokio::test(start_paused = true)]
    async fn retry_waits_at_least_the_server_hint() {
        let gateway = ScriptedGateway::new(vec![Err(rate_limited(Some(5))), Ok("ok".into())]);
        let adapter = backend(&gateway, policy(4, 1000, 2000));

        let result = adapter.call("m1", &[], &messages(), &CallParams::default()).await;
        assert_eq!(result.unwrap(), "ok");

        let times = gateway.call_times();
        assert_eq!(times.len(), 2);
        assert!(times[1].duration_since(times[0]) >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn short_hints_are_floored_at_min_spacing() {
        let gateway = ScriptedGateway::new(vec![Err(rate_limited(Some(1))), Ok("ok".into())]);
        let adapter = backend(&gateway, policy(4, 3000, 500));

        adapter
            .call("m1", &[], &messages(), &CallParams::default())
            .await
            .unwrap();

        let times = gateway.call_times();
        assert!(times[1].duration_since(times[0]) >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn hintless_failures_back_off_exponentially() {
        let gateway = ScriptedGateway::new(vec![
            Err(server_error()),
            Err(server_error()),
            Ok("ok".into()),
        ]);
        let adapter = backend(&gateway, policy(4, 1000, 2000));

        adapter
            .call("m1", &[], &messages(), &CallParams::default())
            .await
            .unwrap();

        let times = gateway.call_times();
        assert_eq!(times.len(), 3);
        assert!(times[1].duration_since(times[0]) >= Duration::from_secs(2));
        assert!(times[2].duration_since(times[1]) >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_advances_candidate_without_exhausting_retries() {
        let gateway = ScriptedGateway::new(vec![Err(not_found("m1")), Ok("from fallback".into())]);
        let adapter = backend(&gateway, policy(4, 10, 10));

        let result = adapter
            .call(
                "m1",
                &["f1".to_string(), "f2".to_string()],
                &messages(),
                &CallParams::default(),
            )
            .await;

        assert_eq!(result.unwrap(), "from fallback");
        assert_eq!(gateway.models_called(), vec!["m1", "f1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_do_not_advance_candidate() {
        let gateway = ScriptedGateway::new(vec![
            Err(rate_limited(None)),
            Err(rate_limited(None)),
        ]);
        let adapter = backend(&gateway, policy(2, 10, 10));

        let result = adapter
            .call("m1", &["f1".to_string()], &messages(), &CallParams::default())
            .await;

        match result {
            Err(GatewayError::RetriesExhausted { attempts, cause, .. }) => {
                assert_eq!(attempts, 2);
                assert!(matches!(*cause, GatewayError::RateLimited { .. }));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        // The fallback candidate was never consulted
        assert_eq!(gateway.models_called(), vec!["m1", "m1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausting_all_candidates_reports_all_models_unavailable() {
        let gateway = ScriptedGateway::new(vec![
            Err(not_found("m1")),
            Err(not_found("f1")),
            Err(not_found("f2")),
        ]);
        let adapter = backend(&gateway, policy(4, 10, 10));

        let result = adapter
            .call(
                "m1",
                &["f1".to_string(), "f2".to_string()],
                &messages(),
                &CallParams::default(),
            )
            .await;

        match result {
            Err(GatewayError::AllModelsUnavailable { cause, .. }) => {
                assert!(matches!(*cause, GatewayError::ModelNotFound { .. }));
            }
            other => panic!("expected AllModelsUnavailable, got {other:?}"),
        }
    }

    // Pins the policy for mixed error kinds on one candidate: a rate limit
    // followed by not-found advances the candidate, and the rate limit is
    // the preferred terminal cause once every candidate is gone.
    #[tokio::test(start_paused = true)]
    async fn prefers_retryable_cause_over_not_found_when_exhausted() {
        let gateway = ScriptedGateway::new(vec![
            Err(rate_limited(Some(1))),
            Err(not_found("m1")),
            Err(not_found("f1")),
            Err(not_found("f2")),
        ]);
        let adapter = backend(&gateway, policy(4, 10, 10));

        let result = adapter
            .call(
                "m1",
                &["f1".to_string(), "f2".to_string()],
                &messages(),
                &CallParams::default(),
            )
            .await;

        match result {
            Err(GatewayError::AllModelsUnavailable { cause, .. }) => {
                assert!(matches!(*cause, GatewayError::RateLimited { .. }));
            }
            other => panic!("expected AllModelsUnavailable, got {other:?}"),
        }
        assert_eq!(gateway.models_called(), vec!["m1", "m1", "f1", "f2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_failures_abort_immediately() {
        let gateway = ScriptedGateway::new(vec![Err(GatewayError::Timeout(Provider::Gemini))]);
        let adapter = backend(&gateway, policy(4, 10, 10));

        let result = adapter
            .call("m1", &["f1".to_string()], &messages(), &CallParams::default())
            .await;

        assert!(matches!(result, Err(GatewayError::Timeout(_))));
        assert_eq!(gateway.models_called(), vec!["m1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_calls_from_concurrent_pipelines_are_spaced() {
        let gateway = ScriptedGateway::new(vec![Ok("a".into()), Ok("b".into())]);
        let adapter = Arc::new(backend(&gateway, policy(4, 2000, 10)));

        let first = Arc::clone(&adapter);
        let handle = tokio::spawn(async move {
            first
                .call("m1", &[], &[Message::user("q1")], &CallParams::default())
                .await
        });
        sleep(Duration::from_millis(10)).await;
        adapter
            .call("m1", &[], &[Message::user("q2")], &CallParams::default())
            .await
            .unwrap();
        handle.await.unwrap().unwrap();

        let times = gateway.call_times();
        assert_eq!(times.len(), 2);
        assert!(times[1].duration_since(times[0]) >= Duration::from_secs(2));
    }
}
