//! Subscription auditor library
//!
//! Scores a spreadsheet of recurring subscriptions on usage, cost and recency,
//! recommends which ones to cancel and explains the recommendation, either with
//! model-written text from the advisor crate or with a deterministic template.

pub mod auditor;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export main types
pub use auditor::Auditor;
pub use error::{AuditorError, AuditorResult};
pub use traits::*;
