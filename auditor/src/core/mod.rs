//! Core business logic modules
//!
//! Pure and deterministic: no I/O, no clocks, no sessions. The as-of date and
//! configuration are always passed in explicitly.

pub mod audit;
pub mod config;
pub mod ingest;
pub mod ranking;
pub mod scoring;
pub mod summary;

pub use audit::{evaluate, Evaluation};
pub use config::{AuditConfig, ColumnAliases};
pub use ranking::rank;
pub use scoring::{score, score_batch, BatchProfile};
pub use summary::{compose_summary, compute_totals, fallback_explanation};
