//! Production API key management
//!
//! Keys are loaded from the process environment, after merging a `.env` file
//! (current directory or a parent, or an explicit path). Variables already set
//! in the environment take precedence over `.env` values.
//!
//! ## Keys per provider
//! - gemini: `GOOGLE_API_KEY`, `GOOGLE_AI_API_KEY`
//! - openai: `OPENAI_API_KEY`
//! - anthropic: `ANTHROPIC_API_KEY`
//!
//! `AUDITOR_<PROVIDER>_BASE_URL` (e.g. `AUDITOR_OPENAI_BASE_URL`) points a
//! provider at a different endpoint such as a local gateway.

use std::path::PathBuf;

use shared::ProviderId;
use crate::traits::{ApiKeySource, RequiredKeyMissing};

/// Real API key source using environment variables
#[derive(Debug, Clone, Default)]
pub struct RealApiKeySource {
    env_file: Option<PathBuf>,
}

impl RealApiKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `.env` values from this file instead of searching the working directory
    pub fn with_env_file(path: impl Into<PathBuf>) -> Self {
        Self {
            env_file: Some(path.into()),
        }
    }

    /// Environment variables consulted for a provider, in priority order
    pub fn key_names(provider: ProviderId) -> &'static [&'static str] {
        match provider {
            ProviderId::Gemini => &["GOOGLE_API_KEY", "GOOGLE_AI_API_KEY"],
            ProviderId::OpenAI => &["OPENAI_API_KEY"],
            ProviderId::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }

    pub fn base_url_variable(provider: ProviderId) -> String {
        format!("AUDITOR_{}_BASE_URL", provider.as_str().to_uppercase())
    }

    /// Merge `.env` values into the environment; a missing file is not an error
    fn init_env(&self) {
        let _ = match &self.env_file {
            Some(path) => dotenv::from_path(path),
            None => dotenv::dotenv().map(|_| ()),
        };
    }

    fn non_blank(name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[async_trait::async_trait]
impl ApiKeySource for RealApiKeySource {
    async fn get_api_key(&self, provider: ProviderId) -> Result<String, RequiredKeyMissing> {
        self.init_env();

        let names = Self::key_names(provider);
        if let Some(key) = names.iter().find_map(|name| Self::non_blank(name)) {
            tracing::debug!("🔑 Found API key for {}", provider);
            return Ok(key);
        }

        Err(RequiredKeyMissing {
            key_name: names.join(", "),
            message: format!(
                "No API key for {}: set {} in the environment or a .env file",
                provider,
                names.join(" or ")
            ),
        })
    }

    fn base_url_override(&self, provider: ProviderId) -> Option<String> {
        self.init_env();
        Self::non_blank(&Self::base_url_variable(provider))
    }
}
