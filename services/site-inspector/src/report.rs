//! Submission report and run summary.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use solar_common::SiteReport;
use tokio::fs;
use tracing::info;

/// Counts for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Sites in the input file
    pub total: usize,
    /// Sites with a report record
    pub processed: usize,
    /// Processed sites with solar inside a buffer
    pub verified: usize,
    /// Sites rejected for invalid coordinates
    pub rejected: usize,
    /// Sites that failed imagery, detection or verification
    pub failed: usize,
    /// Processed sites whose image came from the local samples
    pub fallback_images: usize,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            total = self.total,
            processed = self.processed,
            verified = self.verified,
            rejected = self.rejected,
            failed = self.failed,
            fallback_images = self.fallback_images,
            "Run complete"
        );
    }
}

/// Write the reports as a pretty-printed JSON array.
pub async fn write_report(path: &Path, reports: &[SiteReport]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_vec_pretty(reports).context("Failed to serialize report")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    info!(path = %path.display(), records = reports.len(), "Wrote report");
    Ok(())
}
