//! Audit configuration loaded from JSON and overridden by CLI flags

use serde::{Deserialize, Serialize};
use shared::ScoringConfig;

use crate::error::{AuditorError, AuditorResult};

/// Candidate header names for each canonical spreadsheet column.
///
/// Matching is case-insensitive; see `ingest::map_columns` for the order in
/// which candidates are tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub name: Vec<String>,
    pub monthly_cost: Vec<String>,
    pub last_used_date: Vec<String>,
    pub usage_count: Vec<String>,
    pub category: Vec<String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            name: owned(&["name", "service", "subscription", "vendor", "plan", "description"]),
            monthly_cost: owned(&["monthly_cost", "amount", "price", "cost", "charge", "price_usd", "value"]),
            last_used_date: owned(&["last_used_date", "last_used", "last_activity", "last_accessed", "last_seen"]),
            usage_count: owned(&["usage_count", "uses", "times_used", "count"]),
            category: owned(&["category", "type", "tag"]),
        }
    }
}

/// Everything that shapes one audit besides the input file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub scoring: ScoringConfig,
    pub columns: ColumnAliases,
}

impl AuditConfig {
    /// Parse a JSON config file body; absent sections and fields keep their defaults
    pub fn from_json(content: &str) -> AuditorResult<Self> {
        let config: AuditConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AuditorResult<()> {
        self.scoring.validate()?;

        let required = [
            ("columns.name", &self.columns.name),
            ("columns.monthly_cost", &self.columns.monthly_cost),
            ("columns.last_used_date", &self.columns.last_used_date),
            ("columns.usage_count", &self.columns.usage_count),
        ];
        for (field, aliases) in required {
            if aliases.iter().all(|a| a.trim().is_empty()) {
                return Err(AuditorError::config(format!("{field} needs at least one header name")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_json_is_default_config() {
        let config = AuditConfig::from_json("{}").unwrap();
        assert_eq!(config, AuditConfig::default());
    }

    #[test]
    fn test_partial_scoring_section_keeps_other_defaults() {
        let config = AuditConfig::from_json(
            r#"{"scoring": {"cancel_threshold": 0.55}, "columns": {"name": ["tool"]}}"#,
        )
        .unwrap();

        assert_eq!(config.scoring.cancel_threshold, 0.55);
        assert_eq!(config.scoring.usage_weight, 0.5);
        assert_eq!(config.columns.name, vec!["tool".to_string()]);
        assert_eq!(config.columns.usage_count, ColumnAliases::default().usage_count);
    }

    #[test]
    fn test_essential_categories_from_file() {
        let config = AuditConfig::from_json(
            r#"{"scoring": {"essential_categories": ["accounting", "devops"], "essential_bonus": 0.2}}"#,
        )
        .unwrap();

        assert!(config.scoring.is_essential("DevOps"));
        assert_eq!(config.scoring.essential_bonus, 0.2);
        assert!(AuditConfig::default().scoring.essential_categories.is_empty());
    }

    #[test]
    fn test_invalid_scoring_is_rejected() {
        let result = AuditConfig::from_json(r#"{"scoring": {"recency_half_life_days": 0}}"#);
        assert_matches!(result, Err(AuditorError::SharedError(_)));
    }

    #[test]
    fn test_empty_alias_list_is_rejected() {
        let result = AuditConfig::from_json(r#"{"columns": {"monthly_cost": []}}"#);
        assert_matches!(result, Err(AuditorError::ConfigurationError { field }) if field.contains("monthly_cost"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert_matches!(AuditConfig::from_json("{scoring"), Err(AuditorError::JsonError(_)));
    }
}
