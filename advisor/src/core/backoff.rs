//! Retry decisions for provider failures

use rand::Rng;
use std::time::Duration;

use shared::ApiFailure;
use crate::types::RetryConfig;

/// Delay before the next attempt, or `None` when the failure should be surfaced.
///
/// `attempt` counts from zero for the first retry.
pub fn retry_delay(config: &RetryConfig, failure: &ApiFailure, attempt: u32) -> Option<Duration> {
    if attempt >= config.max_retries || !failure.is_retryable() {
        return None;
    }

    let base = config.initial_delay_ms as f64 * config.backoff_multiplier.powi(attempt as i32);
    let base = base.min(config.max_delay_ms as f64) as u64;
    let jitter = if base >= 10 {
        rand::thread_rng().gen_range(0..=base / 10)
    } else {
        0
    };

    Some(Duration::from_millis(base.saturating_add(jitter).min(config.max_delay_ms)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_retryable_failures_surface_immediately() {
        let config = RetryConfig::default();
        assert!(retry_delay(&config, &ApiFailure::InvalidApiKey, 0).is_none());
        assert!(retry_delay(&config, &ApiFailure::InternalError("500".to_string()), 0).is_none());
    }

    #[test]
    fn test_retries_stop_at_max() {
        let config = RetryConfig {
            max_retries: 2,
            ..RetryConfig::default()
        };
        assert!(retry_delay(&config, &ApiFailure::RateLimitExceeded, 0).is_some());
        assert!(retry_delay(&config, &ApiFailure::RateLimitExceeded, 1).is_some());
        assert!(retry_delay(&config, &ApiFailure::RateLimitExceeded, 2).is_none());
    }

    #[test]
    fn test_delay_grows_and_respects_cap() {
        let config = RetryConfig {
            max_retries: 10,
            initial_delay_ms: 100,
            max_delay_ms: 1_000,
            backoff_multiplier: 2.0,
        };

        let first = retry_delay(&config, &ApiFailure::NetworkTimeout, 0).unwrap();
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(110));

        let third = retry_delay(&config, &ApiFailure::NetworkTimeout, 2).unwrap();
        assert!(third >= Duration::from_millis(400));

        let late = retry_delay(&config, &ApiFailure::NetworkTimeout, 8).unwrap();
        assert_eq!(late, Duration::from_millis(1_000));
    }
}
