//! Totals, templated explanations and the human-readable summary

use shared::{AugmentedText, AuditReport, AuditTotals, ExplanationSource, Recommendation, ScoredSubscription};

/// Candidates named in the templated summary sentence
const NAMED_IN_SUMMARY: usize = 3;

/// Candidates given their own next step in the template
const STEPS_PER_CANDIDATE: usize = 5;

/// Cancellation lines printed in the stdout summary
const TOP_CANCELS_SHOWN: usize = 20;

const GENERIC_STEPS: [&str; 3] = [
    "For each CANCEL candidate: review billing, check for shared accounts, then pause auto-renew or cancel from the provider portal.",
    "For high-cost KEEP subscriptions: negotiate a discount or downgrade the plan.",
    "For unclear items: inspect usage manually or attach invoices for a deeper audit.",
];

pub fn compute_totals(scored: &[ScoredSubscription], recommendation: &Recommendation, skipped: usize) -> AuditTotals {
    let cancel = scored.iter().filter(|s| s.is_cancel()).count();
    AuditTotals {
        analyzed: scored.len(),
        keep: scored.len() - cancel,
        cancel,
        skipped,
        potential_monthly_savings: recommendation.potential_monthly_savings(),
    }
}

/// Deterministic explanation used whenever model text is unavailable
pub fn fallback_explanation(recommendation: &Recommendation, totals: &AuditTotals) -> AugmentedText {
    if recommendation.is_empty() {
        let summary = if totals.analyzed == 0 {
            "No subscriptions could be analyzed, so there is nothing to recommend.".to_string()
        } else {
            format!(
                "All {} subscriptions look fine under the current heuristics; none are suggested for cancellation.",
                totals.analyzed
            )
        };
        return AugmentedText {
            summary,
            next_steps: GENERIC_STEPS[1..].iter().map(|s| s.to_string()).collect(),
            source: ExplanationSource::Template,
        };
    }

    let named = recommendation
        .iter()
        .take(NAMED_IN_SUMMARY)
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ");
    let summary = format!(
        "{} of {} subscriptions are suggested for cancellation, freeing ${:.2}/month. Highest priority: {}.",
        recommendation.len(),
        totals.analyzed,
        recommendation.potential_monthly_savings(),
        named
    );

    let mut next_steps: Vec<String> = recommendation
        .iter()
        .take(STEPS_PER_CANDIDATE)
        .map(|s| format!("Cancel {} (${:.2}/month): {}.", s.name(), s.monthly_cost(), s.reason))
        .collect();
    next_steps.extend(GENERIC_STEPS.iter().map(|s| s.to_string()));

    AugmentedText {
        summary,
        next_steps,
        source: ExplanationSource::Template,
    }
}

/// Render the report the way the CLI prints it
pub fn compose_summary(report: &AuditReport) -> String {
    let totals = &report.totals;
    let mut lines = vec![
        format!("Total subscriptions analyzed: {}", totals.analyzed),
        format!("Suggested to CANCEL: {}", totals.cancel),
        format!("Suggested to KEEP: {}", totals.keep),
    ];
    if totals.skipped > 0 {
        lines.push(format!("Rows skipped: {}", totals.skipped));
    }
    lines.push(format!(
        "Potential monthly savings: ${:.2}",
        totals.potential_monthly_savings
    ));
    lines.push(String::new());
    lines.push("Top cancellation recommendations (highest priority first):".to_string());

    if report.recommendation.is_empty() {
        lines.push(" - None. Your subscriptions look fine under current heuristics.".to_string());
    } else {
        for entry in report.recommendation.iter().take(TOP_CANCELS_SHOWN) {
            lines.push(format!(
                "- {} (${:.2}/month, score {:.2}) => RECOMMENDATION: CANCEL. Why: {}",
                entry.name(),
                entry.monthly_cost(),
                entry.composite_score,
                entry.reason
            ));
        }
    }

    let heading = match report.explanation.source {
        ExplanationSource::Model => "Model explanation:",
        ExplanationSource::Template => "Explanation:",
    };
    lines.push(String::new());
    lines.push(heading.to_string());
    lines.push(report.explanation.summary.clone());

    lines.push(String::new());
    lines.push("Suggested next steps:".to_string());
    for (idx, step) in report.explanation.next_steps.iter().enumerate() {
        lines.push(format!("{}) {}", idx + 1, step));
    }

    if !report.errors.is_empty() {
        lines.push(String::new());
        lines.push(format!("Issues ({}):", report.errors.len()));
        for error in &report.errors {
            lines.push(format!("- {error}"));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{AuditError, Decision, Factor, ScoringConfig, SessionId, SubscriptionRecord};

    fn candidate(name: &str, cost: f64) -> ScoredSubscription {
        ScoredSubscription {
            record: SubscriptionRecord {
                name: name.to_string(),
                monthly_cost: cost,
                last_used_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                usage_count: 0,
                category: "misc".to_string(),
                line: 2,
            },
            usage_score: 0.0,
            cost_score: 0.5,
            recency_score: 0.1,
            composite_score: 0.13,
            decision: Decision::Cancel,
            dominant_factor: Factor::Usage,
            days_since_last_use: 150,
            reason: "low usage (0 uses in period), last used 150 days ago".to_string(),
        }
    }

    #[test]
    fn test_totals_count_decisions() {
        let mut keep = candidate("Keeper", 3.0);
        keep.decision = Decision::Keep;
        let scored = vec![candidate("A", 10.0), candidate("B", 2.5), keep];
        let recommendation = Recommendation::new(scored[..2].to_vec());

        let totals = compute_totals(&scored, &recommendation, 4);

        assert_eq!(totals.analyzed, 3);
        assert_eq!(totals.cancel, 2);
        assert_eq!(totals.keep, 1);
        assert_eq!(totals.skipped, 4);
        assert_eq!(totals.potential_monthly_savings, 12.5);
    }

    #[test]
    fn test_fallback_is_deterministic_and_names_candidates() {
        let recommendation = Recommendation::new(vec![candidate("Gym", 40.0), candidate("Netflix", 15.99)]);
        let totals = compute_totals(recommendation.entries(), &recommendation, 0);

        let first = fallback_explanation(&recommendation, &totals);
        let second = fallback_explanation(&recommendation, &totals);

        assert_eq!(first, second);
        assert_eq!(first.source, ExplanationSource::Template);
        assert!(first.summary.contains("$55.99/month"));
        assert!(first.summary.contains("Gym, Netflix"));
        assert!(first.next_steps[0].starts_with("Cancel Gym ($40.00/month)"));
        assert_eq!(first.next_steps.len(), 2 + GENERIC_STEPS.len());
    }

    #[test]
    fn test_fallback_for_empty_recommendation() {
        let totals = AuditTotals {
            analyzed: 4,
            keep: 4,
            ..AuditTotals::default()
        };
        let text = fallback_explanation(&Recommendation::default(), &totals);
        assert!(text.summary.contains("All 4 subscriptions look fine"));
        assert!(!text.next_steps.is_empty());
    }

    #[test]
    fn test_compose_summary_layout() {
        let recommendation = Recommendation::new(vec![candidate("Gym", 40.0)]);
        let scored = recommendation.entries().to_vec();
        let totals = compute_totals(&scored, &recommendation, 1);
        let report = AuditReport {
            session_id: SessionId::new(),
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            config: ScoringConfig::default(),
            explanation: fallback_explanation(&recommendation, &totals),
            scored,
            recommendation,
            errors: vec![AuditError::malformed(4, "missing name")],
            totals,
        };

        let text = compose_summary(&report);

        assert!(text.starts_with("Total subscriptions analyzed: 1\nSuggested to CANCEL: 1\nSuggested to KEEP: 0"));
        assert!(text.contains("Rows skipped: 1"));
        assert!(text.contains("- Gym ($40.00/month, score 0.13) => RECOMMENDATION: CANCEL."));
        assert!(text.contains("Suggested next steps:\n1) Cancel Gym"));
        assert!(text.contains("Malformed record at line 4: missing name"));
    }
}
