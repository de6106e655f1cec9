//! Advisor implementation with dependency injection

use tracing::{debug, info, warn};

use shared::{AugmentedText, ExplanationSource, Recommendation};
use crate::core::{parse_reply, retry_delay, PromptBuilder};
use crate::error::{AdvisorError, AdvisorResult};
use crate::traits::TextGenerator;
use crate::types::{AdvisorConfig, GenerationRequest, ProviderResponse};

/// Turns a ranked recommendation into model-written advice.
///
/// Each audit run owns its advisor, so retry backoff never couples runs.
pub struct Advisor<G>
where
    G: TextGenerator,
{
    generator: G,
    config: AdvisorConfig,
    prompt_builder: PromptBuilder,
}

impl<G> Advisor<G>
where
    G: TextGenerator,
{
    pub fn new(generator: G, config: AdvisorConfig) -> Self {
        let prompt_builder = PromptBuilder::new(config.max_items);
        Self {
            generator,
            config,
            prompt_builder,
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Ask the provider for a summary and next steps, bounded by the configured timeout
    pub async fn augment(&self, recommendation: &Recommendation) -> AdvisorResult<AugmentedText> {
        if recommendation.is_empty() {
            return Err(AdvisorError::NothingToAugment);
        }

        let request = GenerationRequest {
            model: self.config.model.clone(),
            prompt: self.prompt_builder.build(recommendation),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            provider = %self.generator.provider(),
            model = %request.model,
            candidates = recommendation.len().min(self.prompt_builder.max_items()),
            "Sending recommendation for augmentation"
        );

        let response = tokio::time::timeout(self.config.timeout, self.request_with_retry(&request))
            .await
            .map_err(|_| AdvisorError::Timeout {
                timeout: self.config.timeout,
            })??;

        info!(
            provider = %self.generator.provider(),
            model = %response.model_used,
            tokens = response.tokens_used(),
            elapsed_ms = response.response_time.as_millis() as u64,
            "Received augmentation reply"
        );

        let payload = parse_reply(&response.content)?;
        Ok(AugmentedText {
            summary: payload.summary,
            next_steps: payload.next_steps,
            source: ExplanationSource::Model,
        })
    }

    async fn request_with_retry(&self, request: &GenerationRequest) -> AdvisorResult<ProviderResponse> {
        let mut attempt = 0;
        loop {
            match self.generator.generate(request).await {
                Ok(response) => return Ok(response),
                Err(failure) => match retry_delay(&self.config.retry, &failure, attempt) {
                    Some(delay) => {
                        warn!(
                            provider = %self.generator.provider(),
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %failure,
                            "Retrying augmentation request"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        return Err(AdvisorError::ProviderError {
                            provider: self.generator.provider(),
                            reason: failure,
                        })
                    }
                },
            }
        }
    }
}
