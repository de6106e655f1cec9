//! Session-aware tracing setup shared by every binary
//!
//! Audit runs are tagged with a [`SessionId`]. Events carrying a `session` field
//! can additionally be shipped to an external log relay over HTTP, which is how
//! a dashboard follows a running audit.

use crate::types::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, Event, Subscriber};
use tracing_subscriber::layer::Context;

/// Log relay endpoint configuration
#[derive(Debug, Clone)]
pub struct TracingEndpoint {
    pub url: String,
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl TracingEndpoint {
    pub fn new(url: String) -> Self {
        Self {
            url,
            batch_size: 5,
            flush_interval: Duration::from_millis(500),
        }
    }
}

/// Structured log line as posted to the relay
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TraceEvent {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
    pub session: String,
    pub fields: HashMap<String, serde_json::Value>,
}

/// Tracing layer that batches session-tagged events and posts them to a relay
pub struct HttpTracingLayer {
    sender: mpsc::UnboundedSender<TraceEvent>,
}

/// Handle to the background task posting relay batches
pub struct RelayHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl RelayHandle {
    /// Post whatever is still buffered and wait for the relay task, at most `timeout`
    pub async fn shutdown(self, timeout: Duration) -> bool {
        let _ = self.shutdown.send(());
        matches!(tokio::time::timeout(timeout, self.task).await, Ok(Ok(())))
    }
}

/// Relay task started by [`init_tracing_with_endpoint_and_level`]
static RELAY: Mutex<Option<RelayHandle>> = Mutex::new(None);

impl HttpTracingLayer {
    /// Start the relay task and return the layer feeding it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(endpoint: TracingEndpoint) -> (Self, RelayHandle) {
        let (tx, mut rx) = mpsc::unbounded_channel::<TraceEvent>();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let TracingEndpoint {
            url,
            batch_size,
            flush_interval,
        } = endpoint;

        let task = tokio::spawn(async move {
            let client = reqwest::Client::new();
            let mut buffer = Vec::with_capacity(batch_size);
            let mut flush_timer = tokio::time::interval(flush_interval);

            loop {
                tokio::select! {
                    event = rx.recv() => {
                        match event {
                            Some(event) => {
                                buffer.push(event);
                                if buffer.len() >= batch_size {
                                    Self::send_batch(&client, &url, &mut buffer).await;
                                }
                            }
                            None => break,
                        }
                    }
                    _ = flush_timer.tick() => {
                        if !buffer.is_empty() {
                            Self::send_batch(&client, &url, &mut buffer).await;
                        }
                    }
                    _ = &mut shutdown_rx => {
                        while let Ok(event) = rx.try_recv() {
                            buffer.push(event);
                        }
                        break;
                    }
                }
            }

            if !buffer.is_empty() {
                Self::send_batch(&client, &url, &mut buffer).await;
            }
        });

        (
            HttpTracingLayer { sender: tx },
            RelayHandle {
                shutdown: shutdown_tx,
                task,
            },
        )
    }

    async fn send_batch(client: &reqwest::Client, url: &str, buffer: &mut Vec<TraceEvent>) {
        let batch = std::mem::take(buffer);

        // The relay is best-effort; a failed post must never surface as a tracing
        // event or it would loop back into this layer.
        match client.post(url).json(&batch).send().await {
            Ok(response) if !response.status().is_success() => {
                eprintln!("❌ Log relay rejected {} events: HTTP {}", batch.len(), response.status());
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("❌ Failed to reach log relay at {url}: {e}");
            }
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for HttpTracingLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut fields = HashMap::new();
        let mut message = String::new();

        let mut visitor = TraceVisitor {
            message: &mut message,
            fields: &mut fields,
        };
        event.record(&mut visitor);

        // Only events from the session_* macros are relayed
        let session = match fields.remove("session") {
            Some(serde_json::Value::String(session)) => session,
            Some(other) => other.to_string(),
            None => return,
        };

        let trace_event = TraceEvent {
            timestamp: Utc::now(),
            level: metadata.level().to_string(),
            target: metadata.target().to_string(),
            message,
            session,
            fields,
        };

        let _ = self.sender.send(trace_event);
    }
}

/// Collects an event's message and fields as JSON values
struct TraceVisitor<'a> {
    message: &'a mut String,
    fields: &'a mut HashMap<String, serde_json::Value>,
}

impl tracing::field::Visit for TraceVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message.push_str(&format!("{value:?}"));
        } else {
            self.fields
                .insert(field.name().to_string(), serde_json::Value::String(format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields
                .insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }
}

/// Filter directives for the workspace crates at the given base level
pub fn filter_directives(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("auditor={base_level},advisor={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize tracing with an optional relay endpoint and log level
pub fn init_tracing_with_endpoint_and_level(endpoint: Option<TracingEndpoint>, log_level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let directives = filter_directives(log_level);

    match endpoint {
        Some(endpoint) => {
            eprintln!("📡 Log relay configured: {}", endpoint.url);

            let (http_layer, relay) = HttpTracingLayer::spawn(endpoint);
            if let Ok(mut slot) = RELAY.lock() {
                *slot = Some(relay);
            }
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact();

            tracing_subscriber::registry()
                .with(EnvFilter::new(&directives))
                .with(http_layer)
                .with(fmt_layer)
                .init();
        }
        None => {
            fmt()
                .with_env_filter(EnvFilter::new(&directives))
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .init();
        }
    }
}

/// Longest time [`flush_traces`] waits for the relay to post its last batch
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Post buffered relay events and wait for the relay task before exit
pub async fn flush_traces() {
    let relay = RELAY.lock().ok().and_then(|mut slot| slot.take());
    if let Some(relay) = relay {
        tracing::debug!("Flushing traces before shutdown");
        if !relay.shutdown(FLUSH_TIMEOUT).await {
            eprintln!("⚠️  Log relay did not finish within {FLUSH_TIMEOUT:?}");
        }
    }
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Session-aware info logging
#[macro_export]
macro_rules! session_info {
    ($session_id:expr, $($arg:tt)*) => {
        tracing::info!(
            session = %$session_id,
            timestamp = %$crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Session-aware warning logging
#[macro_export]
macro_rules! session_warn {
    ($session_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            session = %$session_id,
            timestamp = %$crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Session-aware error logging
#[macro_export]
macro_rules! session_error {
    ($session_id:expr, $($arg:tt)*) => {
        tracing::error!(
            session = %$session_id,
            timestamp = %$crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Session-aware debug logging
#[macro_export]
macro_rules! session_debug {
    ($session_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            session = %$session_id,
            timestamp = %$crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

pub fn log_startup(session_id: &SessionId, details: &str) {
    info!(
        session = %session_id,
        timestamp = %format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

pub fn log_error(session_id: &SessionId, context: &str, error: &dyn std::fmt::Display) {
    crate::session_error!(session_id, error = %error, "❌ {} failed: {}", context, error);
}

pub fn log_success(session_id: &SessionId, message: &str) {
    info!(
        session = %session_id,
        timestamp = %format_timestamp(),
        "✅ {}",
        message
    );
}

pub fn log_progress(session_id: &SessionId, action: &str, details: &str) {
    info!(
        session = %session_id,
        timestamp = %format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}
