//! Shared types for the subscription auditor
//!
//! Holds the domain model passed between the scoring core, the advisor and the
//! CLI, the recoverable error taxonomy, and the tracing setup every binary uses.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
