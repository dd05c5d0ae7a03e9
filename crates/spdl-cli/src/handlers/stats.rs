//! Stats command handler.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use spdl_download::{DownloadTracker, FailedTracksFile, TrackerStats};

use crate::bootstrap::CliContext;

/// Execute the stats command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let dir = ctx.download_dir(&ctx.settings)?;
    let stats = DownloadTracker::load(&dir.path).stats();
    let failed = FailedTracksFile::load(&dir.path)
        .ok()
        .flatten()
        .map_or(0, |f| f.len());

    print!("{}", render_stats(&dir.path, &stats, failed));
    Ok(())
}

fn render_stats(dir: &Path, stats: &TrackerStats, failed: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Download directory: {}", dir.display());
    let _ = writeln!(out, "Tracked downloads:  {}", stats.total_downloaded);
    if !stats.formats.is_empty() {
        let _ = writeln!(out, "By format:");
        for (format, count) in &stats.formats {
            let _ = writeln!(out, "  {format:<6} {count}");
        }
    }
    if failed > 0 {
        let _ = writeln!(
            out,
            "Failed last run:    {failed} (run `spotify-downloader retry`)"
        );
    }
    out
}
