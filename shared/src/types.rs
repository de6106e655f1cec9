//! Core shared types and identifiers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{AuditError, SharedError, SharedResult};

/// Identifier attached to every log line of one audit session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> SharedResult<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| SharedError::InvalidUuid { input: s.to_string() })
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text-generation providers the advisor can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAI,
    Anthropic,
    Gemini,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAI),
            "anthropic" | "claude" => Ok(ProviderId::Anthropic),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            _ => Err(format!("Unknown provider: {s}")),
        }
    }
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
        }
    }

    /// Model used when the caller does not name one
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "gpt-4o-mini",
            ProviderId::Anthropic => "claude-3-5-haiku-latest",
            ProviderId::Gemini => "gemini-2.5-flash-lite",
        }
    }
}

/// Classified failure of a provider request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiFailure {
    RateLimitExceeded,
    InvalidApiKey,
    NetworkTimeout,
    ModelUnavailable,
    InvalidRequest(String),
    InternalError(String),
}

impl ApiFailure {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiFailure::RateLimitExceeded | ApiFailure::NetworkTimeout | ApiFailure::ModelUnavailable
        )
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::RateLimitExceeded => write!(f, "rate limit exceeded"),
            ApiFailure::InvalidApiKey => write!(f, "invalid API key"),
            ApiFailure::NetworkTimeout => write!(f, "network timeout"),
            ApiFailure::ModelUnavailable => write!(f, "model unavailable"),
            ApiFailure::InvalidRequest(detail) => write!(f, "invalid request: {detail}"),
            ApiFailure::InternalError(detail) => write!(f, "internal error: {detail}"),
        }
    }
}

/// Weights and thresholds of the keep/cancel heuristic.
///
/// The three weights are applied as given. Callers that want the composite
/// score to span the full `[0, 1]` range should pass weights summing to 1;
/// otherwise the composite is clamped into range.
///
/// Subscriptions whose category is listed in `essential_categories` get
/// `essential_bonus` added to the composite before clamping. The list is
/// empty by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub usage_weight: f64,
    pub cost_weight: f64,
    pub recency_weight: f64,
    pub cancel_threshold: f64,
    pub recency_half_life_days: u32,
    /// Compared case-insensitively against trimmed record categories
    pub essential_categories: Vec<String>,
    pub essential_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            usage_weight: 0.5,
            cost_weight: 0.2,
            recency_weight: 0.3,
            cancel_threshold: 0.4,
            recency_half_life_days: 30,
            essential_categories: Vec::new(),
            essential_bonus: 0.3,
        }
    }
}

impl ScoringConfig {
    /// Whether `category` earns the essential bonus
    pub fn is_essential(&self, category: &str) -> bool {
        let category = category.trim();
        self.essential_categories
            .iter()
            .any(|essential| essential.trim().eq_ignore_ascii_case(category))
    }

    /// Bonus added to the composite of a record in `category`
    pub fn bonus_for(&self, category: &str) -> f64 {
        if self.is_essential(category) {
            self.essential_bonus
        } else {
            0.0
        }
    }

    /// Reject values that would make scores meaningless
    pub fn validate(&self) -> SharedResult<()> {
        let weights = [
            ("usage_weight", self.usage_weight),
            ("cost_weight", self.cost_weight),
            ("recency_weight", self.recency_weight),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(SharedError::InvalidConfig {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if !self.cancel_threshold.is_finite() {
            return Err(SharedError::InvalidConfig {
                field: "cancel_threshold".to_string(),
                value: self.cancel_threshold.to_string(),
            });
        }
        if !self.essential_bonus.is_finite() || self.essential_bonus < 0.0 {
            return Err(SharedError::InvalidConfig {
                field: "essential_bonus".to_string(),
                value: self.essential_bonus.to_string(),
            });
        }
        if self.essential_categories.iter().any(|c| c.trim().is_empty()) {
            return Err(SharedError::InvalidConfig {
                field: "essential_categories".to_string(),
                value: "blank category".to_string(),
            });
        }
        if self.recency_half_life_days == 0 {
            return Err(SharedError::InvalidConfig {
                field: "recency_half_life_days".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// One row of the subscriptions spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub name: String,
    pub monthly_cost: f64,
    pub last_used_date: NaiveDate,
    pub usage_count: u64,
    pub category: String,
    /// Source line in the input file
    pub line: usize,
}

/// Keep/cancel verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Keep,
    Cancel,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Keep => write!(f, "keep"),
            Decision::Cancel => write!(f, "cancel"),
        }
    }
}

/// Sub-score that contributed least to a subscription's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Usage,
    Recency,
    Cost,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Usage => write!(f, "usage"),
            Factor::Recency => write!(f, "recency"),
            Factor::Cost => write!(f, "cost"),
        }
    }
}

/// A record together with its scores and verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSubscription {
    #[serde(flatten)]
    pub record: SubscriptionRecord,
    pub usage_score: f64,
    pub cost_score: f64,
    pub recency_score: f64,
    pub composite_score: f64,
    pub decision: Decision,
    pub dominant_factor: Factor,
    pub days_since_last_use: i64,
    pub reason: String,
}

impl ScoredSubscription {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn monthly_cost(&self) -> f64 {
        self.record.monthly_cost
    }

    pub fn is_cancel(&self) -> bool {
        self.decision == Decision::Cancel
    }
}

/// Cancellation candidates, highest priority first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(Vec<ScoredSubscription>);

impl Recommendation {
    /// Wrap entries that are already filtered and ordered
    pub fn new(entries: Vec<ScoredSubscription>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ScoredSubscription] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredSubscription> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.name()).collect()
    }

    /// Monthly spend freed by cancelling every entry
    pub fn potential_monthly_savings(&self) -> f64 {
        self.0.iter().map(|s| s.monthly_cost()).sum()
    }
}

impl<'a> IntoIterator for &'a Recommendation {
    type Item = &'a ScoredSubscription;
    type IntoIter = std::slice::Iter<'a, ScoredSubscription>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Where the explanatory text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationSource {
    Model,
    Template,
}

/// Natural-language summary and suggested actions for a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedText {
    pub summary: String,
    pub next_steps: Vec<String>,
    pub source: ExplanationSource,
}

/// Headline counts of an audit run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditTotals {
    pub analyzed: usize,
    pub keep: usize,
    pub cancel: usize,
    pub skipped: usize,
    pub potential_monthly_savings: f64,
}

/// Everything one audit run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub session_id: SessionId,
    pub as_of: NaiveDate,
    pub config: ScoringConfig,
    pub scored: Vec<ScoredSubscription>,
    pub recommendation: Recommendation,
    pub explanation: AugmentedText,
    pub errors: Vec<AuditError>,
    pub totals: AuditTotals,
}
