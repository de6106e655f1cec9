//! Advisor error types

use std::time::Duration;
use thiserror::Error;
use shared::{ApiFailure, ProviderId};

/// Result type for advisor operations
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Advisor error types
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Provider request failed: {provider} - {reason}")]
    ProviderError { provider: ProviderId, reason: ApiFailure },

    #[error("Provider did not answer within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Reply could not be parsed: {message}")]
    ReplyParseError { message: String },

    #[error("No API key configured for {provider}")]
    MissingApiKey { provider: ProviderId },

    #[error("Recommendation is empty, nothing to explain")]
    NothingToAugment,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}
