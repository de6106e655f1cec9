//! Advisor library for the subscription auditor
//!
//! Sends ranked cancellation candidates to an external text-generation
//! provider and parses the reply into a summary and next steps. Every failure
//! is reported as an [`AdvisorError`] so the caller can fall back to its own
//! templated explanation.

pub mod advisor_impl;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use advisor_impl::Advisor;
pub use error::{AdvisorError, AdvisorResult};
pub use services::*;
pub use traits::*;
pub use types::*;
