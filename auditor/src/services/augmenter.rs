//! Augmenter implementations
//!
//! Bridges the advisor crate into the auditor's [`Augmenter`] seam and covers
//! the case where augmentation was requested but cannot be configured.

use async_trait::async_trait;

use advisor::{Advisor, AdvisorError, AdvisorResult, TextGenerator};
use shared::{AugmentedText, ProviderId, Recommendation};
use crate::traits::Augmenter;

#[async_trait]
impl<G> Augmenter for Advisor<G>
where
    G: TextGenerator,
{
    async fn augment(&self, recommendation: &Recommendation) -> AdvisorResult<AugmentedText> {
        Advisor::augment(self, recommendation).await
    }
}

#[async_trait]
impl Augmenter for Box<dyn Augmenter> {
    async fn augment(&self, recommendation: &Recommendation) -> AdvisorResult<AugmentedText> {
        (**self).augment(recommendation).await
    }
}

/// Stands in for a provider whose API key is not configured.
///
/// Every call fails, so the runner records why the template was used.
#[derive(Debug, Clone)]
pub struct MissingKeyAugmenter {
    provider: ProviderId,
}

impl MissingKeyAugmenter {
    pub fn new(provider: ProviderId) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Augmenter for MissingKeyAugmenter {
    async fn augment(&self, _recommendation: &Recommendation) -> AdvisorResult<AugmentedText> {
        Err(AdvisorError::MissingApiKey {
            provider: self.provider,
        })
    }
}
