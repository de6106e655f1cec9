//! Cancellation ranking

use std::cmp::Ordering;

use shared::{Recommendation, ScoredSubscription};

/// Worst value first, then the more expensive, then by name
fn priority(a: &ScoredSubscription, b: &ScoredSubscription) -> Ordering {
    a.composite_score
        .total_cmp(&b.composite_score)
        .then_with(|| b.monthly_cost().total_cmp(&a.monthly_cost()))
        .then_with(|| a.name().cmp(b.name()))
}

/// Keep only cancellation candidates, highest priority first
pub fn rank(scored: &[ScoredSubscription]) -> Recommendation {
    let mut candidates: Vec<ScoredSubscription> = scored.iter().filter(|s| s.is_cancel()).cloned().collect();
    candidates.sort_by(priority);
    Recommendation::new(candidates)
}
