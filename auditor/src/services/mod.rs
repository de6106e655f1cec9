//! Service implementations
//!
//! Real implementations of the service traits. These are the only places in
//! the auditor that touch the file system, the environment or the network.

pub mod api_keys;
pub mod augmenter;
pub mod file_system;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use api_keys::RealApiKeySource;
pub use augmenter::MissingKeyAugmenter;
pub use file_system::RealFileSystem;
