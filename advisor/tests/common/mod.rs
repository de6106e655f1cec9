//! Common test utilities for advisor tests

pub mod fixtures;

pub use fixtures::*;
