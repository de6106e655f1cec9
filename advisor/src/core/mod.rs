//! Advisor core logic
//!
//! Prompt construction, reply parsing and backoff computation. Nothing in here
//! performs I/O.

pub mod backoff;
pub mod prompt;
pub mod reply;

pub use backoff::retry_delay;
pub use prompt::PromptBuilder;
pub use reply::parse_reply;
