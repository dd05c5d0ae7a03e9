//! Batch runner: many tracks with bounded concurrency.
//!
//! # Concurrency Model
//!
//! - One task per track in a `JoinSet`, gated by a `Semaphore`
//! - A shared `CancellationToken`: tracks waiting for a permit never start,
//!   running ones are dropped (killing any child process) and end as `Cancelled`
//! - The download tracker sits behind an async mutex shared by all workers

mod worker;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use spdl_core::{
    AudioSourcePort, BatchSummary, DownloadError, DownloadEvent, DownloadEventEmitterPort,
    FailedTrack, OrganizationOptions, SourceKind, Track, TrackOutcome,
};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::failed::FailedTracksFile;
use crate::manager::{MultiSourceDownloader, RetryDelay};
use crate::tracker::DownloadTracker;
use crate::validation::FileValidator;

pub use worker::{TrackJob, WorkerDeps, process_track};

/// Batch options.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub organization: OrganizationOptions,
    /// Tracks downloaded at the same time (at least 1).
    pub max_concurrent: usize,
    pub skip_existing: bool,
    /// Write `failed_tracks.json` after the run.
    pub record_failures: bool,
}

impl BatchConfig {
    pub fn new(organization: OrganizationOptions) -> Self {
        Self {
            organization,
            max_concurrent: 2,
            skip_existing: true,
            record_failures: true,
        }
    }

    /// Output directory of the batch.
    pub fn output_dir(&self) -> &PathBuf {
        &self.organization.output_dir
    }
}

/// Dependencies for building a batch runner.
pub struct BatchDeps {
    /// Enabled sources in any order.
    pub sources: Vec<Arc<dyn AudioSourcePort>>,
    /// Source priority.
    pub priority: Vec<SourceKind>,
    pub emitter: Arc<dyn DownloadEventEmitterPort>,
    pub validator: FileValidator,
    pub retry_delay: RetryDelay,
}

/// Build a batch runner from its dependencies.
pub fn build_batch_runner(deps: BatchDeps, config: BatchConfig) -> BatchRunner {
    let downloader = MultiSourceDownloader::new(deps.sources, &deps.priority)
        .with_retry_delay(deps.retry_delay)
        .with_emitter(Arc::clone(&deps.emitter));
    let tracker = DownloadTracker::load(config.output_dir());

    BatchRunner {
        worker: WorkerDeps {
            downloader: Arc::new(downloader),
            tracker: Arc::new(Mutex::new(tracker)),
            validator: Arc::new(deps.validator),
            emitter: deps.emitter,
            organization: config.organization.clone(),
            skip_existing: config.skip_existing,
        },
        config,
    }
}

/// Downloads a list of tracks.
pub struct BatchRunner {
    worker: WorkerDeps,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn downloader(&self) -> &MultiSourceDownloader {
        &self.worker.downloader
    }

    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Download `tracks`. Stops starting new tracks once `cancel` fires.
    pub async fn run(&self, tracks: Vec<Track>, cancel: CancellationToken) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let total = tracks.len();
        let started = Instant::now();
        let mut summary = BatchSummary::new(run_id);

        self.worker.emitter.emit(DownloadEvent::BatchStarted {
            run_id,
            total,
            sources: self.worker.downloader.available_sources(),
        });
        tracing::info!(%run_id, total, concurrency = self.config.max_concurrent, "Starting batch");

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut tasks = JoinSet::new();

        for (position, track) in tracks.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let deps = self.worker.clone();

            tasks.spawn(async move {
                let permit = tokio::select! {
                    biased;
                    () = cancel.cancelled() => None,
                    permit = semaphore.acquire_owned() => permit.ok(),
                };
                let Some(_permit) = permit else {
                    return (position, track, None);
                };

                let job = TrackJob {
                    index: position + 1,
                    total,
                    track: track.clone(),
                    cancel,
                };
                let outcome = process_track(job, &deps).await;
                (position, track, Some(outcome))
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!(error = %e, "Track task panicked"),
            }
        }
        results.sort_by_key(|(position, _, _)| *position);

        let mut not_started = 0usize;
        for (_, track, outcome) in &results {
            match outcome {
                Some(outcome) => summary.record(track, outcome),
                None => not_started += 1,
            }
        }

        summary.cancelled = cancel.is_cancelled();
        summary.elapsed = started.elapsed();
        if not_started > 0 {
            tracing::info!(not_started, "Batch cancelled before all tracks started");
        }

        if self.config.record_failures {
            self.record_failures(&summary, &results);
        }

        tracing::info!(
            completed = summary.completed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Batch finished"
        );
        self.worker.emitter.emit(DownloadEvent::BatchFinished {
            summary: summary.clone(),
        });
        summary
    }

    /// Save failed (and never started) tracks for `retry`, or clear the file.
    fn record_failures(
        &self,
        summary: &BatchSummary,
        results: &[(usize, Track, Option<TrackOutcome>)],
    ) {
        let output_dir = self.config.output_dir();
        let mut failed = summary.failed_tracks.clone();
        for (_, track, outcome) in results {
            if outcome.is_none() {
                failed.push(FailedTrack::new(track, &DownloadError::Cancelled));
            }
        }

        let result = if failed.is_empty() {
            FailedTracksFile::remove(output_dir)
        } else {
            FailedTracksFile::new(failed)
                .save(output_dir)
                .map(|path| tracing::info!(path = %path.display(), "Saved failed tracks"))
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Could not update failed tracks file");
        }
    }
}
