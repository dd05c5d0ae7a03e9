//! Multi-source download engine for spotify-downloader.
//!
//! - `manager` - tries sources in priority order with per-source retries
//! - `batch` - runs many tracks with bounded concurrency and cancellation
//! - `tracker` - remembers completed downloads per output directory
//! - `validation` - checks downloaded files are complete
//! - `failed` - the `failed_tracks.json` file used by `retry`

#![deny(unused_crate_dependencies)]

// Re-export core types for convenience
pub use spdl_core::download::{
    BatchSummary, DownloadDestination, DownloadError, DownloadEvent, FailedTrack,
    OrganizationOptions, SourceKind, TrackOutcome,
};
pub use spdl_core::ports::{AudioSourcePort, DownloadEventEmitterPort};

// Internal modules
pub(crate) mod progress;

pub use progress::ProgressThrottle;

mod batch;
mod failed;
mod manager;
mod tracker;
mod validation;

pub use batch::{
    BatchConfig, BatchDeps, BatchRunner, TrackJob, WorkerDeps, build_batch_runner, process_track,
};
pub use failed::{FAILED_TRACKS_FILE_NAME, FailedTracksFile};
pub use manager::{MultiSourceDownloader, RetryDelay, SourceDownload};
pub use tracker::{DownloadTracker, TRACKER_FILE_NAME, TrackerEntry, TrackerStats};
pub use validation::{FFPROBE_PROGRAM, FileValidator};

// Silence unused dev-dependency warnings
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use tokio_test as _;
