//! Trait definitions with mockall annotations for testing
//!
//! The audit runner only talks to the outside world through these traits, so
//! tests can drive it with generated mocks instead of files, environment
//! variables and network calls.

use std::path::Path;

use advisor::AdvisorResult;
use shared::{AugmentedText, AuditReport, ProviderId, Recommendation};
use crate::error::AuditorResult;

/// Error when the API key for the selected provider is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredKeyMissing {
    pub key_name: String,
    pub message: String,
}

/// API key source abstraction for dependency injection
#[mockall::automock]
#[async_trait::async_trait]
pub trait ApiKeySource: Send + Sync {
    /// Key for the given provider
    ///
    /// # Returns
    /// The first non-blank key among the provider's variable names, or
    /// `RequiredKeyMissing` naming every variable that was checked
    async fn get_api_key(&self, provider: ProviderId) -> Result<String, RequiredKeyMissing>;

    /// Base URL override for the provider, if one is configured
    fn base_url_override(&self, provider: ProviderId) -> Option<String>;
}

/// File system abstraction for dependency injection
#[mockall::automock]
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync {
    /// Read the raw bytes of an input file
    ///
    /// Decoding is left to the ingest step so encoding detection stays pure.
    async fn read_input(&self, path: &Path) -> AuditorResult<Vec<u8>>;

    /// Write the report as pretty-printed JSON, creating parent directories
    async fn write_report(&self, path: &Path, report: &AuditReport) -> AuditorResult<()>;
}

/// Natural-language augmentation of a recommendation
#[mockall::automock]
#[async_trait::async_trait]
pub trait Augmenter: Send + Sync {
    /// Explain the recommendation; any error makes the caller fall back to its template
    async fn augment(&self, recommendation: &Recommendation) -> AdvisorResult<AugmentedText>;
}
