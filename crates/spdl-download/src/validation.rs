//! Completeness checks for downloaded audio files.
//!
//! Duration is probed with `ffprobe` when it is installed; otherwise the
//! file size is compared against a rough bitrate estimate.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use spdl_core::{DownloadError, Track};
use tokio::process::Command;

/// Program used to read durations.
pub const FFPROBE_PROGRAM: &str = "ffprobe";

/// Accepted ratio of probed to expected duration.
const DURATION_RATIO: std::ops::RangeInclusive<f64> = 0.85..=1.15;

/// Rough size of one minute of compressed audio.
const BYTES_PER_MINUTE: f64 = 500_000.0;

/// Share of the size estimate a file must reach.
const SIZE_MARGIN: f64 = 0.7;

/// Files this large are kept when probing fails.
const FALLBACK_MIN_BYTES: u64 = 500_000;

/// Checks that a downloaded file is a whole track.
#[derive(Debug, Clone, Default)]
pub struct FileValidator {
    ffprobe: Option<PathBuf>,
}

impl FileValidator {
    /// Validator using `ffprobe` from `PATH` when present.
    pub fn new() -> Self {
        Self {
            ffprobe: which::which(FFPROBE_PROGRAM).ok(),
        }
    }

    /// Validator that only looks at file sizes.
    pub const fn size_only() -> Self {
        Self { ffprobe: None }
    }

    /// Validator using a specific `ffprobe` binary.
    pub fn with_ffprobe(path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: Some(path.into()),
        }
    }

    pub fn has_probe(&self) -> bool {
        self.ffprobe.is_some()
    }

    /// Duration in seconds reported by `ffprobe`, `None` when it has none.
    pub async fn probe_duration(&self, path: &Path) -> Result<Option<f64>, DownloadError> {
        let Some(ffprobe) = self.ffprobe.as_deref() else {
            return Ok(None);
        };

        let output = Command::new(ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DownloadError::process_failed(FFPROBE_PROGRAM, stderr));
        }

        Ok(parse_duration(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Whether `path` holds the complete `track`.
    pub async fn is_complete(&self, path: &Path, track: &Track) -> bool {
        let size = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.len(),
            Err(_) => return false,
        };
        if size == 0 {
            return false;
        }
        if !track.has_duration() {
            return true;
        }

        match self.probe_duration(path).await {
            Ok(Some(duration)) => {
                let expected = track.duration_secs();
                let ok = DURATION_RATIO.contains(&(duration / expected));
                if ok {
                    tracing::debug!(duration, expected, "Duration check passed");
                } else {
                    tracing::warn!(
                        path = %path.display(),
                        duration,
                        expected,
                        "Duration mismatch"
                    );
                }
                ok
            }
            Ok(None) => size_looks_complete(size, track),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not probe file");
                size > FALLBACK_MIN_BYTES
            }
        }
    }
}

fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find_map(|line| line.parse::<f64>().ok())
        .filter(|d| *d > 0.0)
}

#[allow(clippy::cast_precision_loss)]
fn size_looks_complete(size: u64, track: &Track) -> bool {
    let estimate = track.duration_secs() / 60.0 * BYTES_PER_MINUTE;
    let ok = size as f64 >= estimate * SIZE_MARGIN;
    if !ok {
        tracing::warn!(size, estimate, "File too small for its duration");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(duration_ms: u64) -> Track {
        Track::new("Song", "Artist", "Album").with_duration_ms(duration_ms)
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("203.52\n"), Some(203.52));
        assert_eq!(parse_duration("N/A\n"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_size_estimate() {
        // 4 minutes: estimate 2_000_000 bytes, 70% is 1_400_000.
        assert!(size_looks_complete(1_400_001, &track(240_000)));
        assert!(!size_looks_complete(1_399_000, &track(240_000)));
    }

    #[tokio::test]
    async fn test_missing_and_empty_files() {
        let temp = tempfile::tempdir().unwrap();
        let validator = FileValidator::size_only();
        assert!(!validator.is_complete(&temp.path().join("nope.mp3"), &track(1000)).await);

        let empty = temp.path().join("empty.mp3");
        std::fs::write(&empty, b"").unwrap();
        assert!(!validator.is_complete(&empty, &track(0)).await);
    }

    #[tokio::test]
    async fn test_unknown_duration_accepts_non_empty() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("song.flac");
        std::fs::write(&file, b"abc").unwrap();
        assert!(FileValidator::size_only().is_complete(&file, &track(0)).await);
    }

    #[tokio::test]
    async fn test_size_only_validation() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("song.mp3");
        std::fs::write(&file, vec![0u8; 400_000]).unwrap();

        let validator = FileValidator::size_only();
        // One minute: needs 350_000 bytes.
        assert!(validator.is_complete(&file, &track(60_000)).await);
        // Three minutes: needs 1_050_000 bytes.
        assert!(!validator.is_complete(&file, &track(180_000)).await);
    }

    #[tokio::test]
    async fn test_ffprobe_failure_falls_back_to_size() {
        let temp = tempfile::tempdir().unwrap();
        let small = temp.path().join("small.mp3");
        let large = temp.path().join("large.mp3");
        std::fs::write(&small, vec![0u8; 1000]).unwrap();
        std::fs::write(&large, vec![0u8; 600_000]).unwrap();

        let validator = FileValidator::with_ffprobe(temp.path().join("missing-ffprobe"));
        assert!(!validator.is_complete(&small, &track(1_000)).await);
        assert!(validator.is_complete(&large, &track(600_000)).await);
    }
}
