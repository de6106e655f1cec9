//! Advisor trait definitions for dependency injection

use async_trait::async_trait;

use shared::{ApiFailure, ProviderId};
use crate::types::{GenerationRequest, ProviderResponse};

/// Text-generation backend the advisor sends prompts to
#[mockall::automock]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider this generator talks to
    fn provider(&self) -> ProviderId;

    /// Send one completion request
    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ApiFailure>;
}
