//! Pure audit pipeline: ingest, score, rank and total one batch

use chrono::NaiveDate;
use shared::{AuditError, AuditTotals, Recommendation, ScoredSubscription};

use super::config::AuditConfig;
use super::ingest::{decode, parse_records};
use super::ranking::rank;
use super::scoring::score_batch;
use super::summary::compute_totals;

/// Everything an audit produces before augmentation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub scored: Vec<ScoredSubscription>,
    pub recommendation: Recommendation,
    pub errors: Vec<AuditError>,
    pub totals: AuditTotals,
}

/// Evaluate raw input bytes; never fails, problems are reported in `errors`
pub fn evaluate(input: &[u8], config: &AuditConfig, as_of: NaiveDate) -> Evaluation {
    let outcome = parse_records(&decode(input), &config.columns);
    let skipped = outcome.skipped();
    let mut errors = outcome.errors;

    if outcome.records.is_empty() {
        errors.push(AuditError::EmptyBatch);
    }

    let scored = score_batch(&outcome.records, &config.scoring, as_of);
    let recommendation = rank(&scored);
    let totals = compute_totals(&scored, &recommendation, skipped);

    Evaluation {
        scored,
        recommendation,
        errors,
        totals,
    }
}
