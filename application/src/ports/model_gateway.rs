//! Model gateway port
//!
//! Defines the uniform call contract over heterogeneous model backends, and
//! the error taxonomy every adapter in front of it must speak.

use arena_domain::{Message, Provider};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Sampling parameters for one call
#[derive(Debug, Clone, Copy, Default)]
pub struct CallParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CallParams {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        }
    }
}

/// Errors from gateway and adapter operations
///
/// Exactly one of these (or text) comes back from every call; nothing is
/// swallowed along the way.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No credential configured for {0}")]
    CredentialMissing(Provider),

    #[error("Call to {0} timed out")]
    Timeout(Provider),

    #[error("{0} returned an empty response")]
    EmptyResponse(Provider),

    #[error("{provider} rate limited (retry hint: {retry_after:?})")]
    RateLimited {
        provider: Provider,
        /// Server-supplied suggested wait before retrying
        retry_after: Option<Duration>,
    },

    #[error("{provider} upstream error {status}: {message}")]
    Upstream {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("Model {model} not found on {provider}")]
    ModelNotFound { provider: Provider, model: String },

    #[error("Transport error talking to {provider}: {message}")]
    Transport { provider: Provider, message: String },

    #[error("Gave up on {provider} after {attempts} attempts: {cause}")]
    RetriesExhausted {
        provider: Provider,
        attempts: u32,
        cause: Box<GatewayError>,
    },

    #[error("All models unavailable on {provider}: {cause}")]
    AllModelsUnavailable {
        provider: Provider,
        cause: Box<GatewayError>,
    },
}

impl GatewayError {
    /// Retryable failures are rate limits (429) and upstream 5xx errors;
    /// everything else aborts the attempt immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited { .. } | GatewayError::Upstream { .. }
        )
    }

    /// Server-supplied wait suggestion, when the backend sent one
    pub fn retry_hint(&self) -> Option<Duration> {
        match self {
            GatewayError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Uniform call contract over heterogeneous model backends
///
/// Implementations translate the generic message sequence into each
/// backend's wire shape and extract the first candidate's text. The
/// quota-aware adapter stack implements the same trait, so callers never
/// see retry policy.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(
        &self,
        provider: Provider,
        model: &str,
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError>;
}
