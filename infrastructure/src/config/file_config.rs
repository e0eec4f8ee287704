//! Raw TOML configuration data types
//!
//! These structs mirror the exact structure of the TOML config file and are
//! deserialized directly. Conversion methods resolve them into the typed
//! settings each layer consumes.

use crate::gateway::GatewayConfig;
use crate::quota::RetryPolicy;
use arena_application::{ExecutionParams, ModelCatalog, ModelChain, RunMode};
use arena_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// `[experiment]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExperimentConfig {
    /// Debate rounds before synthesis
    pub rounds: u32,
    /// Condition scheduling: "serial" or "concurrent"
    pub mode: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileExperimentConfig {
    fn default() -> Self {
        Self {
            rounds: 2,
            mode: "serial".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// `[limits]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLimitsConfig {
    /// Hard per-call timeout in seconds
    pub call_timeout_secs: u64,
    /// Attempts per model candidate
    pub max_attempts: u32,
    /// Minimum spacing between calls to one backend, in milliseconds
    pub min_spacing_ms: u64,
    /// First hintless backoff delay, in milliseconds
    pub base_backoff_ms: u64,
}

impl Default for FileLimitsConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 60,
            max_attempts: 4,
            min_spacing_ms: 1500,
            base_backoff_ms: 2000,
        }
    }
}

/// `[providers.gemini]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name holding the API key
    pub api_key_env: String,
    pub base_url: String,
    /// Preferred model
    pub model: String,
    /// Ordered fallback candidates
    pub fallbacks: Vec<String>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
            fallbacks: vec![
                "gemini-2.0-flash-lite".to_string(),
                "gemini-1.5-flash".to_string(),
            ],
        }
    }
}

/// `[providers.openai]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name holding the API key
    pub api_key_env: String,
    pub base_url: String,
    /// Preferred model
    pub model: String,
    /// Ordered fallback candidates
    pub fallbacks: Vec<String>,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            fallbacks: vec!["gpt-4o".to_string(), "gpt-3.5-turbo".to_string()],
        }
    }
}

/// `[providers]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Substitute deterministic placeholders for providers without a
    /// credential instead of failing the call
    pub allow_placeholder: bool,
    pub gemini: FileGeminiConfig,
    pub openai: FileOpenAiConfig,
}

/// `[log]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Directory for per-run transcript JSONL files; unset disables them
    pub transcript_dir: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub experiment: FileExperimentConfig,
    pub limits: FileLimitsConfig,
    pub providers: FileProvidersConfig,
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Resolve the execution parameters; rejects unknown run modes.
    pub fn execution_params(&self) -> Result<ExecutionParams, DomainError> {
        let mode: RunMode = self.experiment.mode.parse()?;
        Ok(ExecutionParams {
            rounds: self.experiment.rounds.max(1),
            mode,
            temperature: self.experiment.temperature,
            max_tokens: self.experiment.max_tokens,
        })
    }

    pub fn model_catalog(&self) -> ModelCatalog {
        ModelCatalog {
            gemini: ModelChain::new(
                self.providers.gemini.model.clone(),
                self.providers.gemini.fallbacks.clone(),
            ),
            openai: ModelChain::new(
                self.providers.openai.model.clone(),
                self.providers.openai.fallbacks.clone(),
            ),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.limits.max_attempts.max(1),
            min_spacing: Duration::from_millis(self.limits.min_spacing_ms),
            base_backoff: Duration::from_millis(self.limits.base_backoff_ms),
        }
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            call_timeout: Duration::from_secs(self.limits.call_timeout_secs.max(1)),
            allow_placeholder: self.providers.allow_placeholder,
            gemini_base_url: self.providers.gemini.base_url.clone(),
            openai_base_url: self.providers.openai.base_url.clone(),
        }
    }
}
