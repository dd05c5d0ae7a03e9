//! Per-track outcomes and batch totals.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DownloadError;
use super::types::SourceKind;
use crate::domain::Track;

/// Result of processing one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Downloaded and validated.
    Downloaded {
        path: PathBuf,
        source: SourceKind,
        size: u64,
    },
    /// Already present; nothing was downloaded.
    Skipped { path: PathBuf, size: u64 },
    /// Every attempt failed.
    Failed { error: DownloadError },
}

impl TrackOutcome {
    /// Whether the track ended up on disk (downloaded or already there).
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// A track that could not be downloaded, in the shape stored for `retry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTrack {
    pub name: String,
    pub artist: String,
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
    pub error: String,
    /// Full track metadata so a retry can plan the same destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
}

impl FailedTrack {
    /// Record a failure for `track`.
    pub fn new(track: &Track, error: &DownloadError) -> Self {
        Self {
            name: track.name.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            spotify_url: track.spotify_url.clone(),
            error: error.to_string(),
            track: Some(track.clone()),
        }
    }

    /// Rebuild the track to retry.
    pub fn to_track(&self) -> Track {
        self.track.clone().unwrap_or_else(|| {
            let mut track = Track::new(&self.name, &self.artist, &self.album);
            track.spotify_url.clone_from(&self.spotify_url);
            track
        })
    }
}

impl std::fmt::Display for FailedTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.name)
    }
}

/// Totals for a finished batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub elapsed: Duration,
    pub cancelled: bool,
    pub failed_tracks: Vec<FailedTrack>,
}

impl BatchSummary {
    /// Empty summary for a new run.
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            completed: 0,
            failed: 0,
            skipped: 0,
            elapsed: Duration::ZERO,
            cancelled: false,
            failed_tracks: Vec::new(),
        }
    }

    /// Count an outcome.
    pub fn record(&mut self, track: &Track, outcome: &TrackOutcome) {
        match outcome {
            TrackOutcome::Downloaded { .. } => self.completed += 1,
            TrackOutcome::Skipped { .. } => self.skipped += 1,
            TrackOutcome::Failed { error } => {
                self.failed += 1;
                self.failed_tracks.push(FailedTrack::new(track, error));
            }
        }
    }

    /// Tracks processed.
    pub const fn total(&self) -> usize {
        self.completed + self.failed + self.skipped
    }

    /// Downloaded tracks as a percentage of the total (0 when empty).
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed as f64 / total as f64 * 100.0
        }
    }

    /// Average seconds per downloaded track, if any were downloaded.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_secs_per_track(&self) -> Option<f64> {
        (self.completed > 0).then(|| self.elapsed.as_secs_f64() / self.completed as f64)
    }

    /// Whether any track failed.
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::new(Uuid::new_v4());
        assert_eq!(summary.total(), 0);
        assert!(summary.success_rate().abs() < f64::EPSILON);
        assert!(summary.average_secs_per_track().is_none());
    }

    #[test]
    fn test_record_outcomes() {
        let mut summary = BatchSummary::new(Uuid::new_v4());
        let track = Track::new("Song", "Artist", "Album");

        summary.record(
            &track,
            &TrackOutcome::Downloaded {
                path: PathBuf::from("a.flac"),
                source: SourceKind::Jamendo,
                size: 10,
            },
        );
        summary.record(
            &track,
            &TrackOutcome::Skipped {
                path: PathBuf::from("b.flac"),
                size: 10,
            },
        );
        summary.record(
            &track,
            &TrackOutcome::Failed {
                error: DownloadError::AllSourcesFailed {
                    attempted: vec![SourceKind::Youtube],
                },
            },
        );
        summary.record(
            &track,
            &TrackOutcome::Downloaded {
                path: PathBuf::from("c.flac"),
                source: SourceKind::Youtube,
                size: 10,
            },
        );
        summary.elapsed = Duration::from_secs(10);

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.completed, 2);
        assert!((summary.success_rate() - 50.0).abs() < 1e-9);
        assert!((summary.average_secs_per_track().unwrap() - 5.0).abs() < 1e-9);
        assert!(summary.has_failures());
        assert_eq!(summary.failed_tracks.len(), 1);
        assert!(summary.failed_tracks[0].error.contains("youtube"));
    }

    #[test]
    fn test_failed_track_rebuilds_track() {
        let track = Track::new("Song", "Artist", "Album")
            .with_track_number(3)
            .with_spotify_url("https://open.spotify.com/track/x");
        let failed = FailedTrack::new(&track, &DownloadError::Cancelled);
        assert_eq!(failed.to_track(), track);

        let legacy = FailedTrack {
            track: None,
            ..failed
        };
        let rebuilt = legacy.to_track();
        assert_eq!(rebuilt.name, "Song");
        assert_eq!(rebuilt.track_number, 1);
        assert_eq!(
            rebuilt.spotify_url.as_deref(),
            Some("https://open.spotify.com/track/x")
        );
    }
}
