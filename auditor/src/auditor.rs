//! Audit runner
//!
//! Coordinates one audit session: reads the input through the injected
//! [`FileSystem`], runs the pure evaluation, asks the injected [`Augmenter`]
//! for an explanation and falls back to the template when it cannot deliver.
//! Every step is logged with the session id so an external relay can follow it.

use std::path::Path;

use chrono::NaiveDate;
use shared::{
    logging, session_debug, session_info, session_warn, AuditError, AuditReport, AugmentedText, Recommendation,
    SessionId,
};

use crate::core::{evaluate, fallback_explanation, AuditConfig, Evaluation};
use crate::error::AuditorResult;
use crate::traits::{Augmenter, FileSystem};

/// Runs audits with injected services
pub struct Auditor<F, A>
where
    F: FileSystem,
    A: Augmenter,
{
    session_id: SessionId,
    config: AuditConfig,
    file_system: F,
    /// `None` when augmentation is switched off
    augmenter: Option<A>,
}

impl<F, A> Auditor<F, A>
where
    F: FileSystem,
    A: Augmenter,
{
    pub fn new(session_id: SessionId, config: AuditConfig, file_system: F, augmenter: Option<A>) -> Self {
        Self {
            session_id,
            config,
            file_system,
            augmenter,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit the spreadsheet at `input` as of the given date.
    ///
    /// Only an unreadable input file is an error; everything else ends up in
    /// the report's error list.
    pub async fn run(&self, input: &Path, as_of: NaiveDate) -> AuditorResult<AuditReport> {
        logging::log_startup(&self.session_id, &format!("audit of {} as of {}", input.display(), as_of));

        let bytes = self.file_system.read_input(input).await.map_err(|e| {
            logging::log_error(&self.session_id, "Reading input", &e);
            e
        })?;

        let Evaluation {
            scored,
            recommendation,
            mut errors,
            totals,
        } = evaluate(&bytes, &self.config, as_of);

        for entry in &scored {
            session_info!(
                self.session_id,
                name = %entry.name(),
                decision = %entry.decision,
                composite = entry.composite_score,
                usage = entry.usage_score,
                cost = entry.cost_score,
                recency = entry.recency_score,
                "📊 Scored {}: {} ({})",
                entry.name(),
                entry.decision,
                entry.reason
            );
        }

        for (rank, entry) in recommendation.iter().enumerate() {
            session_info!(
                self.session_id,
                rank = rank + 1,
                name = %entry.name(),
                monthly_cost = entry.monthly_cost(),
                "✂️  Recommend cancelling #{}: {} (${:.2}/month)",
                rank + 1,
                entry.name(),
                entry.monthly_cost()
            );
        }

        let explanation = self.explain(&recommendation, &totals, &mut errors).await;

        for error in &errors {
            session_warn!(self.session_id, error = %error, "⚠️  {}", error);
        }

        logging::log_success(
            &self.session_id,
            &format!(
                "Audit complete: {} analyzed, {} keep, {} cancel, {} skipped, ${:.2}/month potential savings",
                totals.analyzed, totals.keep, totals.cancel, totals.skipped, totals.potential_monthly_savings
            ),
        );

        Ok(AuditReport {
            session_id: self.session_id,
            as_of,
            config: self.config.scoring.clone(),
            scored,
            recommendation,
            explanation,
            errors,
            totals,
        })
    }

    /// Model text when available, the template otherwise
    async fn explain(
        &self,
        recommendation: &Recommendation,
        totals: &shared::AuditTotals,
        errors: &mut Vec<AuditError>,
    ) -> AugmentedText {
        let augmenter = match &self.augmenter {
            Some(augmenter) if !recommendation.is_empty() => augmenter,
            Some(_) => {
                session_debug!(self.session_id, "Nothing to cancel, skipping augmentation");
                return fallback_explanation(recommendation, totals);
            }
            None => {
                session_debug!(self.session_id, "Augmentation disabled, using template");
                return fallback_explanation(recommendation, totals);
            }
        };

        logging::log_progress(
            &self.session_id,
            "Augmenting",
            &format!("{} cancellation candidates", recommendation.len()),
        );

        match augmenter.augment(recommendation).await {
            Ok(text) => {
                session_info!(self.session_id, steps = text.next_steps.len(), "🤖 Received model explanation");
                text
            }
            Err(e) => {
                errors.push(AuditError::augmentation(e.to_string()));
                fallback_explanation(recommendation, totals)
            }
        }
    }

    /// Persist a report produced by [`Auditor::run`]
    pub async fn write_report(&self, path: &Path, report: &AuditReport) -> AuditorResult<()> {
        self.file_system.write_report(path, report).await?;
        session_info!(self.session_id, path = %path.display(), "💾 Report written");
        Ok(())
    }
}
