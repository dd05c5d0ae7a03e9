//! Download events.
//!
//! Emitted by the batch runner through `DownloadEventEmitterPort`. Each
//! adapter decides how to present them (progress bars, plain lines, logs).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::summary::BatchSummary;
use super::types::SourceKind;
use crate::domain::Track;

/// Events describing the progress of a download batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    /// A batch is about to start.
    BatchStarted {
        run_id: Uuid,
        total: usize,
        sources: Vec<SourceKind>,
    },

    /// Work on a track began (1-based index).
    TrackStarted {
        index: usize,
        total: usize,
        track: Track,
    },

    /// A source is being tried for a track.
    SourceAttempt {
        track: Track,
        source: SourceKind,
        attempt: u32,
        max_attempts: u32,
    },

    /// Bytes received for a track.
    TrackProgress {
        track: Track,
        source: SourceKind,
        downloaded: u64,
        total: u64,
    },

    /// The track was downloaded and validated.
    TrackCompleted {
        track: Track,
        source: SourceKind,
        path: PathBuf,
        size: u64,
    },

    /// The track was already present and complete.
    TrackSkipped {
        track: Track,
        path: PathBuf,
        size: u64,
    },

    /// The track could not be downloaded.
    TrackFailed { track: Track, error: String },

    /// The batch finished (or was cancelled).
    BatchFinished { summary: BatchSummary },
}

impl DownloadEvent {
    /// Short event name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BatchStarted { .. } => "batch_started",
            Self::TrackStarted { .. } => "track_started",
            Self::SourceAttempt { .. } => "source_attempt",
            Self::TrackProgress { .. } => "track_progress",
            Self::TrackCompleted { .. } => "track_completed",
            Self::TrackSkipped { .. } => "track_skipped",
            Self::TrackFailed { .. } => "track_failed",
            Self::BatchFinished { .. } => "batch_finished",
        }
    }

    /// The track this event refers to, if any.
    pub const fn track(&self) -> Option<&Track> {
        match self {
            Self::TrackStarted { track, .. }
            | Self::SourceAttempt { track, .. }
            | Self::TrackProgress { track, .. }
            | Self::TrackCompleted { track, .. }
            | Self::TrackSkipped { track, .. }
            | Self::TrackFailed { track, .. } => Some(track),
            Self::BatchStarted { .. } | Self::BatchFinished { .. } => None,
        }
    }
}
