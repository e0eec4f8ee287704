//! Resolved per-provider model catalog

use arena_domain::Provider;

/// Preferred model plus ordered fallback candidates for one provider
#[derive(Debug, Clone)]
pub struct ModelChain {
    pub preferred: String,
    pub fallbacks: Vec<String>,
}

impl ModelChain {
    pub fn new(preferred: impl Into<String>, fallbacks: Vec<String>) -> Self {
        Self {
            preferred: preferred.into(),
            fallbacks,
        }
    }
}

/// Model catalog for every provider in the closed set
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    pub gemini: ModelChain,
    pub openai: ModelChain,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            gemini: ModelChain::new(
                "gemini-2.0-flash",
                vec![
                    "gemini-2.0-flash-lite".to_string(),
                    "gemini-1.5-flash".to_string(),
                ],
            ),
            openai: ModelChain::new(
                "gpt-4o-mini",
                vec!["gpt-4o".to_string(), "gpt-3.5-turbo".to_string()],
            ),
        }
    }
}

impl ModelCatalog {
    pub fn chain(&self, provider: Provider) -> &ModelChain {
        match provider {
            Provider::Gemini => &self.gemini,
            Provider::OpenAi => &self.openai,
        }
    }

    /// Fallback candidates for a call that prefers `model`, excluding the
    /// preferred model itself.
    pub fn fallbacks_for(&self, provider: Provider, model: &str) -> Vec<String> {
        self.chain(provider)
            .fallbacks
            .iter()
            .filter(|candidate| candidate.as_str() != model)
            .cloned()
            .collect()
    }
}
