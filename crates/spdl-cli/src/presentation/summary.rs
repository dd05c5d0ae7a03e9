//! End-of-batch summary.

use std::fmt::Write;

use spdl_core::BatchSummary;
use spdl_core::utils::format_duration;

const RULE_WIDTH: usize = 60;

/// Print a horizontal rule.
pub fn print_separator() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

/// Print the summary block.
pub fn print_summary(summary: &BatchSummary) {
    print!("{}", render_summary(summary));
}

/// Render the summary block: totals, rates, timing and the failed list.
pub fn render_summary(summary: &BatchSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "DOWNLOAD SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "✓ Completed:    {}", summary.completed);
    let _ = writeln!(out, "✗ Failed:       {}", summary.failed);
    let _ = writeln!(out, "⊙ Skipped:      {}", summary.skipped);
    let _ = writeln!(out, "∑ Total:        {}", summary.total());
    let _ = writeln!(out);
    let _ = writeln!(out, "Success Rate:   {:.1}%", summary.success_rate());
    let _ = writeln!(
        out,
        "Time Elapsed:   {}",
        format_duration(summary.elapsed.as_secs_f64())
    );
    if let Some(avg) = summary.average_secs_per_track() {
        let _ = writeln!(out, "Avg per song:   {}", format_duration(avg));
    }
    if summary.cancelled {
        let _ = writeln!(out, "⚠ Cancelled: remaining tracks were not started");
    }
    let _ = writeln!(out, "{rule}");

    if !summary.failed_tracks.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "❌ Failed Downloads:");
        for (i, failed) in summary.failed_tracks.iter().enumerate() {
            let _ = writeln!(out, "  {}. {failed}", i + 1);
            let _ = writeln!(out, "     Error: {}", failed.error);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use spdl_core::{DownloadError, SourceKind, Track, TrackOutcome};
    use uuid::Uuid;

    #[test]
    fn test_render_summary() {
        let mut summary = BatchSummary::new(Uuid::new_v4());
        let ok = Track::new("One", "Artist", "Album");
        let bad = Track::new("Two", "Artist", "Album");
        summary.record(
            &ok,
            &TrackOutcome::Downloaded {
                path: PathBuf::from("one.flac"),
                source: SourceKind::Jamendo,
                size: 1,
            },
        );
        summary.record(
            &bad,
            &TrackOutcome::Failed {
                error: DownloadError::AllSourcesFailed {
                    attempted: vec![SourceKind::Youtube],
                },
            },
        );
        summary.elapsed = Duration::from_secs(185);

        let text = render_summary(&summary);
        assert!(text.contains("✓ Completed:    1"));
        assert!(text.contains("✗ Failed:       1"));
        assert!(text.contains("∑ Total:        2"));
        assert!(text.contains("Success Rate:   50.0%"));
        assert!(text.contains("Time Elapsed:   3m 5s"));
        assert!(text.contains("Avg per song:   3m 5s"));
        assert!(text.contains("1. Artist - Two"));
        assert!(text.contains("Error: Failed to download from all sources (youtube)"));
        assert!(!text.contains("Cancelled"));
    }

    #[test]
    fn test_render_empty_cancelled_summary() {
        let mut summary = BatchSummary::new(Uuid::new_v4());
        summary.cancelled = true;

        let text = render_summary(&summary);
        assert!(text.contains("Success Rate:   0.0%"));
        assert!(!text.contains("Avg per song"));
        assert!(text.contains("Cancelled"));
        assert!(!text.contains("Failed Downloads"));
    }
}
