//! Advisor data types

use std::time::Duration;
use serde::{Deserialize, Serialize};
use shared::ProviderId;

/// A single completion request sent to a provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Provider response data
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub model_used: String,
    pub response_time: Duration,
}

impl ProviderResponse {
    pub fn tokens_used(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// Backoff policy for retryable provider failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 500,
            max_delay_ms: 4_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Settings for one advisor instance
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub model: String,
    /// Upper bound for the whole augmentation, retries included
    pub timeout: Duration,
    /// How many top cancellation candidates go into the prompt
    pub max_items: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub retry: RetryConfig,
}

impl AdvisorConfig {
    pub fn for_provider(provider: ProviderId) -> Self {
        Self {
            model: provider.default_model().to_string(),
            timeout: Duration::from_secs(25),
            max_items: 10,
            max_tokens: 1024,
            temperature: 0.3,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::for_provider(ProviderId::Gemini)
    }
}

/// Shape the model is asked to answer with
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplyPayload {
    pub summary: String,
    pub next_steps: Vec<String>,
}
