//! Main entry point for the auditor binary
//!
//! Wires the real services into an [`Auditor`], runs one audit session and
//! prints the summary to stdout. Logs go to stderr and, with `--trace-ep`, to
//! an external log relay.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use advisor::{Advisor, AdvisorConfig, RealProviderClient};
use auditor::core::{compose_summary, AuditConfig};
use auditor::services::{MissingKeyAugmenter, RealApiKeySource, RealFileSystem};
use auditor::{ApiKeySource, Auditor, Augmenter, FileSystem};
use shared::{logging, session_debug, session_warn, ProviderId, SessionId};

/// Audit recurring subscriptions and recommend which ones to cancel
#[derive(Parser, Debug)]
#[command(name = "auditor")]
#[command(about = "Scores subscriptions on usage, cost and recency and recommends cancellations")]
pub struct Args {
    /// Subscriptions spreadsheet (CSV, TSV or similar, with a header row)
    pub csv: PathBuf,

    /// Date to measure recency against (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// JSON config file with `scoring` and `columns` sections
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub usage_weight: Option<f64>,

    #[arg(long)]
    pub cost_weight: Option<f64>,

    #[arg(long)]
    pub recency_weight: Option<f64>,

    /// Composite score below which a subscription is recommended for cancellation
    #[arg(long)]
    pub cancel_threshold: Option<f64>,

    /// Days after which the recency score halves
    #[arg(long)]
    pub half_life_days: Option<u32>,

    /// Category whose subscriptions get the essential bonus (repeatable)
    #[arg(long = "essential-category")]
    pub essential_categories: Vec<String>,

    /// Amount added to the composite score of essential subscriptions
    #[arg(long)]
    pub essential_bonus: Option<f64>,

    /// Text-generation provider (gemini, openai, anthropic)
    #[arg(long, default_value = "gemini")]
    pub provider: ProviderId,

    /// Model name (defaults to the provider's default model)
    #[arg(long)]
    pub model: Option<String>,

    /// Upper bound for the whole augmentation call, retries included
    #[arg(long, default_value = "25")]
    pub timeout_secs: u64,

    /// Cancellation candidates sent to the model
    #[arg(long, default_value = "10")]
    pub max_items: usize,

    /// Skip the model and use the templated explanation
    #[arg(long)]
    pub no_augment: bool,

    /// Write the full report as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Session id to tag log lines with (generated when absent)
    #[arg(long)]
    pub session_id: Option<String>,

    /// Tracing endpoint URL for the log relay
    #[arg(long)]
    pub trace_ep: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Config file values with CLI overrides applied
    async fn audit_config(&self, file_system: &impl FileSystem) -> Result<AuditConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let bytes = file_system.read_input(path).await?;
                let content = String::from_utf8(bytes)
                    .with_context(|| format!("Config file {} is not valid UTF-8", path.display()))?;
                AuditConfig::from_json(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => AuditConfig::default(),
        };

        let scoring = &mut config.scoring;
        if let Some(weight) = self.usage_weight {
            scoring.usage_weight = weight;
        }
        if let Some(weight) = self.cost_weight {
            scoring.cost_weight = weight;
        }
        if let Some(weight) = self.recency_weight {
            scoring.recency_weight = weight;
        }
        if let Some(threshold) = self.cancel_threshold {
            scoring.cancel_threshold = threshold;
        }
        if let Some(days) = self.half_life_days {
            scoring.recency_half_life_days = days;
        }
        if !self.essential_categories.is_empty() {
            scoring.essential_categories = self.essential_categories.clone();
        }
        if let Some(bonus) = self.essential_bonus {
            scoring.essential_bonus = bonus;
        }

        config.validate().context("Invalid scoring configuration")?;
        Ok(config)
    }

    fn advisor_config(&self) -> AdvisorConfig {
        let config = AdvisorConfig::for_provider(self.provider)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_items(self.max_items);
        match &self.model {
            Some(model) => config.with_model(model.clone()),
            None => config,
        }
    }
}

/// Build the augmenter for the selected provider.
///
/// A missing key or an unusable client does not stop the audit: the
/// returned augmenter fails and the report records why.
async fn build_augmenter(args: &Args, api_keys: &impl ApiKeySource, session_id: SessionId) -> Box<dyn Augmenter> {
    let provider = args.provider;
    let key = match api_keys.get_api_key(provider).await {
        Ok(key) => key,
        Err(missing) => {
            session_warn!(session_id, key = %missing.key_name, "🔑 {}", missing.message);
            return Box::new(MissingKeyAugmenter::new(provider));
        }
    };

    let client = match RealProviderClient::new(provider, key) {
        Ok(client) => client,
        Err(e) => {
            logging::log_error(&session_id, "Creating provider client", &e);
            return Box::new(MissingKeyAugmenter::new(provider));
        }
    };
    let client = match api_keys.base_url_override(provider) {
        Some(url) => {
            session_debug!(session_id, "Using {} base URL override {}", provider, url);
            client.with_base_url(url)
        }
        None => client,
    };

    Box::new(Advisor::new(client, args.advisor_config()))
}

fn parse_session_id(raw: Option<&str>) -> Result<SessionId> {
    match raw {
        Some(raw) => SessionId::from_string(raw).with_context(|| format!("Invalid session id '{raw}'")),
        None => Ok(SessionId::new()),
    }
}

async fn write_report_if_requested(
    auditor: &Auditor<RealFileSystem, Box<dyn Augmenter>>,
    output: Option<&Path>,
    report: &shared::AuditReport,
) -> Result<()> {
    if let Some(path) = output {
        auditor
            .write_report(path, report)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let trace_endpoint = args.trace_ep.clone().map(logging::TracingEndpoint::new);
    logging::init_tracing_with_endpoint_and_level(trace_endpoint, Some(&args.log_level));

    let session_id = parse_session_id(args.session_id.as_deref())?;
    let file_system = RealFileSystem::new();
    let config = args.audit_config(&file_system).await?;
    let as_of = args.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());

    let augmenter = if args.no_augment {
        None
    } else {
        Some(build_augmenter(&args, &RealApiKeySource::new(), session_id).await)
    };

    let auditor = Auditor::new(session_id, config, file_system, augmenter);
    let report = auditor
        .run(&args.csv, as_of)
        .await
        .with_context(|| format!("Failed to audit {}", args.csv.display()))?;

    println!("\n===== Subscription Audit Summary =====");
    println!("{}", compose_summary(&report));
    println!("===== End of Summary =====\n");

    write_report_if_requested(&auditor, args.output.as_deref(), &report).await?;

    logging::flush_traces().await;
    Ok(())
}
