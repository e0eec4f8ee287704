//! Routing facade over the per-backend quota adapters

use crate::quota::adapter::{QuotaAwareBackend, RetryPolicy};
use arena_application::{CallParams, GatewayError, ModelCatalog, ModelGateway};
use arena_domain::{Message, Provider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Implements the gateway port by routing every call through the quota
/// adapter owned for its provider, resolving the fallback chain from the
/// model catalog.
///
/// One adapter (and therefore one FIFO queue) exists per provider for the
/// lifetime of this router; all pipelines share them.
pub struct QuotaRouter<G> {
    backends: HashMap<Provider, QuotaAwareBackend<G>>,
    catalog: ModelCatalog,
}

impl<G: ModelGateway> QuotaRouter<G> {
    pub fn new(gateway: Arc<G>, catalog: ModelCatalog, policy: RetryPolicy) -> Self {
        let backends = Provider::all()
            .into_iter()
            .map(|provider| {
                (
                    provider,
                    QuotaAwareBackend::new(provider, Arc::clone(&gateway), policy.clone()),
                )
            })
            .collect();
        Self { backends, catalog }
    }
}

#[async_trait]
impl<G: ModelGateway> ModelGateway for QuotaRouter<G> {
    async fn generate(
        &self,
        provider: Provider,
        model: &str,
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError> {
        let backend = self
            .backends
            .get(&provider)
            .ok_or_else(|| GatewayError::Transport {
                provider,
                message: "no adapter registered for provider".to_string(),
            })?;

        let fallbacks = self.catalog.fallbacks_for(provider, model);
        backend.call(model, &fallbacks, messages, params).await
    }
}
