//! Prompt construction for cancellation advice

use shared::Recommendation;

const INSTRUCTIONS: &str = r#"You are a pragmatic, senior CFO assistant. The subscriptions below were flagged for cancellation by a usage/cost/recency audit, highest priority first.

Reply with a single JSON object and nothing else:
{
  "summary": "two or three sentences on why these subscriptions should go and what it saves",
  "next_steps": ["one concrete action per line, e.g. which portal setting to change or who to notify"]
}

Keep each next step under 25 words. Mention what to verify before cancelling if something might break."#;

/// Builds the augmentation prompt from a ranked recommendation
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_items: usize,
}

impl PromptBuilder {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items: max_items.max(1),
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Render the instructions followed by one line per candidate
    pub fn build(&self, recommendation: &Recommendation) -> String {
        let shown = recommendation.len().min(self.max_items);
        let mut lines = vec![INSTRUCTIONS.to_string(), String::new()];

        lines.push(format!(
            "Candidates ({} of {}, potential savings ${:.2}/month):",
            shown,
            recommendation.len(),
            recommendation.potential_monthly_savings()
        ));

        for entry in recommendation.iter().take(self.max_items) {
            lines.push(format!(
                "- {} ({}): ${:.2}/month, score {:.2}, {} uses, last used {} days ago. Reason: {}",
                entry.record.name,
                entry.record.category,
                entry.record.monthly_cost,
                entry.composite_score,
                entry.record.usage_count,
                entry.days_since_last_use,
                entry.reason
            ));
        }

        lines.join("\n")
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{Decision, Factor, ScoredSubscription, SubscriptionRecord};

    fn candidate(name: &str, cost: f64) -> ScoredSubscription {
        ScoredSubscription {
            record: SubscriptionRecord {
                name: name.to_string(),
                monthly_cost: cost,
                last_used_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                usage_count: 1,
                category: "streaming".to_string(),
                line: 2,
            },
            usage_score: 0.0,
            cost_score: 0.0,
            recency_score: 0.0,
            composite_score: 0.05,
            decision: Decision::Cancel,
            dominant_factor: Factor::Usage,
            days_since_last_use: 200,
            reason: "low usage (1 uses in period), last used 200 days ago".to_string(),
        }
    }

    #[test]
    fn test_prompt_lists_candidates_in_order() {
        let recommendation = Recommendation::new(vec![candidate("Netflix", 15.0), candidate("Hulu", 12.0)]);
        let prompt = PromptBuilder::new(10).build(&recommendation);

        let netflix = prompt.find("- Netflix (streaming): $15.00/month").unwrap();
        let hulu = prompt.find("- Hulu (streaming): $12.00/month").unwrap();
        assert!(netflix < hulu);
        assert!(prompt.contains("potential savings $27.00/month"));
        assert!(prompt.contains("\"next_steps\""));
    }

    #[test]
    fn test_prompt_is_capped_at_max_items() {
        let entries = (0..5).map(|i| candidate(&format!("Service{i}"), 10.0)).collect();
        let prompt = PromptBuilder::new(2).build(&Recommendation::new(entries));

        assert!(prompt.contains("Candidates (2 of 5"));
        assert!(prompt.contains("- Service1 "));
        assert!(!prompt.contains("- Service2 "));
    }

    #[test]
    fn test_zero_max_items_still_sends_one() {
        assert_eq!(PromptBuilder::new(0).max_items(), 1);
    }
}
