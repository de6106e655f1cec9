//! Service-specific tests
//!
//! Each service has its own test file; anything touching disk works inside a
//! `tempfile` directory.


use shared::{
    AuditError, AuditReport, AuditTotals, AugmentedText, ExplanationSource, Recommendation, ScoringConfig, SessionId,
};

/// Minimal report used by the file system tests
pub fn sample_report() -> AuditReport {
    AuditReport {
        session_id: SessionId::new(),
        as_of: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        config: ScoringConfig::default(),
        scored: Vec::new(),
        recommendation: Recommendation::default(),
        explanation: AugmentedText {
            summary: "Nothing to cancel.".to_string(),
            next_steps: vec!["Review again next quarter.".to_string()],
            source: ExplanationSource::Template,
        },
        errors: vec![AuditError::EmptyBatch],
        totals: AuditTotals::default(),
    }
}
