//! Usage, cost and recency scoring
//!
//! Every sub-score lies in `[0, 1]` where higher means "more worth keeping".
//! Usage and cost are relative to the batch, so a [`BatchProfile`] of observed
//! maxima is computed once and passed to [`score`] for every record.

use chrono::NaiveDate;
use shared::{Decision, Factor, ScoredSubscription, ScoringConfig, SubscriptionRecord};

/// Batch-wide maxima the relative sub-scores are measured against
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchProfile {
    pub max_usage: u64,
    pub max_cost: f64,
}

impl BatchProfile {
    pub fn from_records(records: &[SubscriptionRecord]) -> Self {
        records.iter().fold(Self::default(), |profile, record| Self {
            max_usage: profile.max_usage.max(record.usage_count),
            max_cost: profile.max_cost.max(record.monthly_cost),
        })
    }
}

/// Whole days between last use and the as-of date; future dates count as today
pub fn days_since(last_used: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - last_used).num_days().max(0)
}

pub fn usage_score(usage_count: u64, profile: &BatchProfile) -> f64 {
    if usage_count == 0 || profile.max_usage == 0 {
        return 0.0;
    }
    (usage_count as f64 / profile.max_usage as f64).clamp(0.0, 1.0)
}

/// Exponential decay that halves every `half_life_days`
pub fn recency_score(days: i64, half_life_days: u32) -> f64 {
    let half_life = f64::from(half_life_days.max(1));
    0.5_f64.powf(days.max(0) as f64 / half_life).clamp(0.0, 1.0)
}

pub fn cost_score(monthly_cost: f64, profile: &BatchProfile) -> f64 {
    if profile.max_cost <= 0.0 {
        return 1.0;
    }
    (1.0 - monthly_cost / profile.max_cost).clamp(0.0, 1.0)
}

/// Lowest sub-score; ties go to usage, then recency, then cost
pub fn dominant_factor(usage: f64, recency: f64, cost: f64) -> Factor {
    if usage <= recency && usage <= cost {
        Factor::Usage
    } else if recency <= cost {
        Factor::Recency
    } else {
        Factor::Cost
    }
}

fn reason(factor: Factor, record: &SubscriptionRecord, days: i64) -> String {
    match factor {
        Factor::Usage => format!(
            "low usage ({} uses in period), last used {} days ago",
            record.usage_count, days
        ),
        Factor::Recency => format!(
            "stale usage (last used {} days ago), {} uses in period",
            days, record.usage_count
        ),
        Factor::Cost => format!(
            "high cost (${:.2}/month relative to batch), {} uses in period, last used {} days ago",
            record.monthly_cost, record.usage_count, days
        ),
    }
}

/// Score one record against its batch
pub fn score(
    record: &SubscriptionRecord,
    profile: &BatchProfile,
    config: &ScoringConfig,
    as_of: NaiveDate,
) -> ScoredSubscription {
    let days = days_since(record.last_used_date, as_of);
    let usage = usage_score(record.usage_count, profile);
    let recency = recency_score(days, config.recency_half_life_days);
    let cost = cost_score(record.monthly_cost, profile);

    let weighted = config.usage_weight * usage + config.cost_weight * cost + config.recency_weight * recency;
    let composite = (weighted + config.bonus_for(&record.category)).clamp(0.0, 1.0);
    let decision = if composite < config.cancel_threshold {
        Decision::Cancel
    } else {
        Decision::Keep
    };
    let factor = dominant_factor(usage, recency, cost);

    ScoredSubscription {
        record: record.clone(),
        usage_score: usage,
        cost_score: cost,
        recency_score: recency,
        composite_score: composite,
        decision,
        dominant_factor: factor,
        days_since_last_use: days,
        reason: reason(factor, record, days),
    }
}

/// Score every record in input order
pub fn score_batch(
    records: &[SubscriptionRecord],
    config: &ScoringConfig,
    as_of: NaiveDate,
) -> Vec<ScoredSubscription> {
    let profile = BatchProfile::from_records(records);
    records
        .iter()
        .map(|record| score(record, &profile, config, as_of))
        .collect()
}
