//! Test fixtures for advisor tests

use std::time::Duration;

use advisor::{AdvisorConfig, ProviderResponse, RetryConfig};
use chrono::NaiveDate;
use shared::{Decision, Factor, ProviderId, Recommendation, ScoredSubscription, SubscriptionRecord};

/// A cancellation candidate with plausible scores
pub fn cancel_candidate(name: &str, monthly_cost: f64, usage_count: u64) -> ScoredSubscription {
    ScoredSubscription {
        record: SubscriptionRecord {
            name: name.to_string(),
            monthly_cost,
            last_used_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            usage_count,
            category: "streaming".to_string(),
            line: 2,
        },
        usage_score: 0.05,
        cost_score: 0.2,
        recency_score: 0.1,
        composite_score: 0.11,
        decision: Decision::Cancel,
        dominant_factor: Factor::Usage,
        days_since_last_use: 100,
        reason: format!("low usage ({usage_count} uses in period), last used 100 days ago"),
    }
}

pub fn sample_recommendation() -> Recommendation {
    Recommendation::new(vec![
        cancel_candidate("Netflix", 15.99, 1),
        cancel_candidate("Gym Pass", 40.0, 0),
    ])
}

/// Provider response wrapping the given content
pub fn response_with(content: &str) -> ProviderResponse {
    ProviderResponse {
        content: content.to_string(),
        prompt_tokens: 120,
        completion_tokens: 60,
        model_used: "test-model".to_string(),
        response_time: Duration::from_millis(40),
    }
}

pub const VALID_REPLY: &str = r#"{"summary": "Two unused services cost $55.99 a month.", "next_steps": ["Cancel Netflix in account settings", "Ask the front desk to end the gym pass"]}"#;

/// Config with tiny backoff delays so retries finish quickly
pub fn fast_config() -> AdvisorConfig {
    AdvisorConfig::for_provider(ProviderId::OpenAI)
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryConfig {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        })
}
