//! Real file system service implementation
//!
//! Reads input spreadsheets and writes JSON reports. Reports are written to a
//! sibling temp file first and renamed into place so a crash never leaves a
//! half-written report behind.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs;

use shared::AuditReport;
use crate::error::{AuditorError, AuditorResult};
use crate::traits::FileSystem;

/// Real file system implementation backed by `tokio::fs`
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn read_input(&self, path: &Path) -> AuditorResult<Vec<u8>> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| AuditorError::file_system("read", path, e))?;
        tracing::debug!("📂 Read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    async fn write_report(&self, path: &Path, report: &AuditReport) -> AuditorResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AuditorError::file_system("create directory", parent, e))?;
        }

        let content = serde_json::to_string_pretty(report)?;
        let temp = Self::temp_path(path);
        fs::write(&temp, content)
            .await
            .map_err(|e| AuditorError::file_system("write", &temp, e))?;
        fs::rename(&temp, path)
            .await
            .map_err(|e| AuditorError::file_system("rename", path, e))?;

        tracing::debug!("💾 Wrote report to {}", path.display());
        Ok(())
    }
}
