//! Retry command handler.
//!
//! Re-runs the tracks recorded in `failed_tracks.json` of the download
//! directory.

use anyhow::{Context, Result};
use spdl_core::BatchSummary;
use spdl_download::FailedTracksFile;

use crate::bootstrap::CliContext;
use crate::commands::DownloadOptions;
use crate::handlers::download::run_batch;

/// Execute the retry command.
///
/// Returns `None` when there was nothing to retry.
pub async fn execute(ctx: &CliContext, options: DownloadOptions) -> Result<Option<BatchSummary>> {
    let settings = ctx.effective_settings(&options)?;
    let dir = ctx.download_dir(&settings)?;

    let failed = FailedTracksFile::load(&dir.path)
        .with_context(|| format!("Failed to read failed tracks in {}", dir.path.display()))?;
    let Some(failed) = failed.filter(|f| !f.is_empty()) else {
        println!("No failed downloads recorded in {}", dir.path.display());
        return Ok(None);
    };

    println!(
        "Retrying {} track(s) that failed on {}\n",
        failed.len(),
        failed.saved_at.format("%Y-%m-%d %H:%M")
    );
    run_batch(&settings, &dir.path, failed.to_tracks())
        .await
        .map(Some)
}
