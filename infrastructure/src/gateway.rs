//! HTTP model gateway
//!
//! Implements the [`ModelGateway`] port over `reqwest`: credential lookup,
//! per-provider wire translation, a hard per-call timeout, and first-candidate
//! text extraction. No side effects beyond the network call.

use crate::providers::{gemini, openai};
use arena_application::{CallParams, GatewayError, ModelGateway};
use arena_domain::util::excerpt;
use arena_domain::{Message, Provider, Role};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Bytes of the latest user message echoed into a placeholder reply
const PLACEHOLDER_EXCERPT_MAX: usize = 160;

/// Bytes of an error body kept in error messages
const ERROR_BODY_MAX: usize = 240;

/// Gateway settings resolved from configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Hard per-call timeout; expiry aborts the call
    pub call_timeout: Duration,
    /// Substitute a deterministic placeholder when a credential is missing,
    /// instead of failing with `CredentialMissing`
    pub allow_placeholder: bool,
    pub gemini_base_url: String,
    pub openai_base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(60),
            allow_placeholder: false,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
        }
    }
}

/// Raw backend credentials, keyed by provider
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    keys: HashMap<Provider, String>,
}

impl CredentialStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read credentials from the configured environment variable names.
    /// Unset or blank variables leave the provider without a credential.
    pub fn from_env(gemini_env: &str, openai_env: &str) -> Self {
        let mut store = Self::default();
        for (provider, name) in [(Provider::Gemini, gemini_env), (Provider::OpenAi, openai_env)] {
            if let Ok(key) = std::env::var(name)
                && !key.trim().is_empty()
            {
                store.keys.insert(provider, key);
            }
        }
        store
    }

    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.keys.insert(provider, key.into());
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }
}

/// HTTP implementation of the model gateway port
pub struct HttpGateway {
    http: reqwest::Client,
    config: GatewayConfig,
    credentials: CredentialStore,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig, credentials: CredentialStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            credentials,
        }
    }

    /// Clearly marked deterministic stand-in derived from the prompt
    fn placeholder_reply(prompt: &str) -> String {
        format!(
            "[offline placeholder] {}",
            excerpt(prompt, PLACEHOLDER_EXCERPT_MAX)
        )
    }

    async fn dispatch(
        &self,
        provider: Provider,
        key: &str,
        model: &str,
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError> {
        match provider {
            Provider::Gemini => self.call_gemini(key, model, messages, params).await,
            Provider::OpenAi => self.call_openai(key, model, messages, params).await,
        }
    }

    async fn call_gemini(
        &self,
        key: &str,
        model: &str,
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError> {
        let provider = Provider::Gemini;
        let url = gemini::endpoint(&self.config.gemini_base_url, model);
        let request = gemini::build_request(messages, params);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                provider,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let header_hint = retry_after_hint(&response);
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                404 => GatewayError::ModelNotFound {
                    provider,
                    model: model.to_string(),
                },
                401 | 403 => GatewayError::CredentialMissing(provider),
                429 => GatewayError::RateLimited {
                    provider,
                    retry_after: gemini::parse_retry_delay(&body).or(header_hint),
                },
                s if (500..600).contains(&s) => GatewayError::Upstream {
                    provider,
                    status: s,
                    message: excerpt(&body, ERROR_BODY_MAX),
                },
                s => GatewayError::Transport {
                    provider,
                    message: format!("unexpected status {s}: {}", excerpt(&body, ERROR_BODY_MAX)),
                },
            });
        }

        let parsed: gemini::GenerateContentResponse =
            response.json().await.map_err(|e| GatewayError::Transport {
                provider,
                message: e.to_string(),
            })?;

        gemini::extract_text(&parsed).ok_or(GatewayError::EmptyResponse(provider))
    }

    async fn call_openai(
        &self,
        key: &str,
        model: &str,
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError> {
        let provider = Provider::OpenAi;
        let url = openai::endpoint(&self.config.openai_base_url);
        let request = openai::build_request(model, messages, params);

        let response = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                provider,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let header_hint = retry_after_hint(&response);
            let body = response.text().await.unwrap_or_default();
            return Err(if openai::is_model_not_found(status, &body) {
                GatewayError::ModelNotFound {
                    provider,
                    model: model.to_string(),
                }
            } else {
                match status {
                    401 | 403 => GatewayError::CredentialMissing(provider),
                    429 => GatewayError::RateLimited {
                        provider,
                        retry_after: header_hint,
                    },
                    s if (500..600).contains(&s) => GatewayError::Upstream {
                        provider,
                        status: s,
                        message: excerpt(&body, ERROR_BODY_MAX),
                    },
                    s => GatewayError::Transport {
                        provider,
                        message: format!(
                            "unexpected status {s}: {}",
                            excerpt(&body, ERROR_BODY_MAX)
                        ),
                    },
                }
            });
        }

        let parsed: openai::ChatCompletionResponse =
            response.json().await.map_err(|e| GatewayError::Transport {
                provider,
                message: e.to_string(),
            })?;

        openai::extract_text(&parsed).ok_or(GatewayError::EmptyResponse(provider))
    }
}

fn retry_after_hint(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(openai::parse_retry_after)
}

#[async_trait]
impl ModelGateway for HttpGateway {
    async fn generate(
        &self,
        provider: Provider,
        model: &str,
        messages: &[Message],
        params: &CallParams,
    ) -> Result<String, GatewayError> {
        // The call contract requires an addressable prompt
        let Some(prompt) = messages.iter().rev().find(|m| m.role == Role::User) else {
            return Err(GatewayError::Transport {
                provider,
                message: "no user prompt in message sequence".to_string(),
            });
        };

        let Some(key) = self.credentials.get(provider) else {
            if self.config.allow_placeholder {
                debug!(provider = %provider, "No credential; substituting placeholder reply");
                return Ok(Self::placeholder_reply(&prompt.content));
            }
            return Err(GatewayError::CredentialMissing(provider));
        };

        match tokio::time::timeout(
            self.config.call_timeout,
            self.dispatch(provider, key, model, messages, params),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(provider = %provider, model, "Call exceeded the hard timeout");
                Err(GatewayError::Timeout(provider))
            }
        }
    }
}
