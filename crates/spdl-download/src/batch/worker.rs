//! Processing of a single track.
//!
//! The worker owns nothing: it receives cloned `Arc` dependencies and emits
//! the per-track events in order (started, attempts and progress, outcome).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spdl_core::{
    DownloadDestination, DownloadError, DownloadEvent, DownloadEventEmitterPort,
    OrganizationOptions, Track, TrackOutcome,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::manager::MultiSourceDownloader;
use crate::tracker::DownloadTracker;
use crate::validation::FileValidator;

/// Dependencies shared by all workers of a batch.
#[derive(Clone)]
pub struct WorkerDeps {
    pub downloader: Arc<MultiSourceDownloader>,
    pub tracker: Arc<Mutex<DownloadTracker>>,
    pub validator: Arc<FileValidator>,
    pub emitter: Arc<dyn DownloadEventEmitterPort>,
    pub organization: OrganizationOptions,
    pub skip_existing: bool,
}

/// One track of a batch.
pub struct TrackJob {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub track: Track,
    pub cancel: CancellationToken,
}

/// Run `job` to an outcome, emitting its events.
pub async fn process_track(job: TrackJob, deps: &WorkerDeps) -> TrackOutcome {
    let TrackJob {
        index,
        total,
        track,
        cancel,
    } = job;

    deps.emitter.emit(DownloadEvent::TrackStarted {
        index,
        total,
        track: track.clone(),
    });
    tracing::info!(index, total, track = %track, "Processing track");

    let outcome = tokio::select! {
        biased;

        () = cancel.cancelled() => {
            if let Ok(destination) = DownloadDestination::plan(&deps.organization, &track) {
                remove_partial_files(&destination);
            }
            TrackOutcome::Failed { error: DownloadError::Cancelled }
        }

        outcome = run(&track, deps) => outcome.unwrap_or_else(|error| TrackOutcome::Failed { error }),
    };

    let event = match &outcome {
        TrackOutcome::Downloaded { path, source, size } => DownloadEvent::TrackCompleted {
            track,
            source: *source,
            path: path.clone(),
            size: *size,
        },
        TrackOutcome::Skipped { path, size } => DownloadEvent::TrackSkipped {
            track,
            path: path.clone(),
            size: *size,
        },
        TrackOutcome::Failed { error } => {
            tracing::warn!(track = %track, error = %error, "Track failed");
            DownloadEvent::TrackFailed {
                track,
                error: error.to_string(),
            }
        }
    };
    deps.emitter.emit(event);
    outcome
}

async fn run(track: &Track, deps: &WorkerDeps) -> Result<TrackOutcome, DownloadError> {
    let destination = DownloadDestination::plan(&deps.organization, track)?;

    let mut previous = None;
    if let Some(existing) = destination.find_existing() {
        if deps.skip_existing {
            if let Some(outcome) = check_existing(track, &existing, deps).await {
                return Ok(outcome);
            }
            tracing::warn!(path = %existing.display(), "Existing file appears incomplete, re-downloading");
            remove_file_quietly(&existing);
        } else {
            previous = Some(SetAside::new(existing)?);
        }
    }

    destination.ensure_dir()?;
    let outcome = download_validated(track, &destination, deps).await?;
    if let Some(previous) = previous {
        previous.discard();
    }
    Ok(outcome)
}

async fn download_validated(
    track: &Track,
    destination: &DownloadDestination,
    deps: &WorkerDeps,
) -> Result<TrackOutcome, DownloadError> {
    let download = deps.downloader.download(track, destination).await?;

    if !deps.validator.is_complete(&download.path, track).await {
        remove_file_quietly(&download.path);
        return Err(DownloadError::incomplete(format!(
            "{} failed validation",
            download.path.display()
        )));
    }

    let size = std::fs::metadata(&download.path)?.len();
    if let Err(e) = deps.tracker.lock().await.mark_downloaded(track, &download.path) {
        tracing::warn!(error = %e, "Could not update download tracker");
    }

    Ok(TrackOutcome::Downloaded {
        path: download.path,
        source: download.source,
        size,
    })
}

/// `Some(Skipped)` when the existing file is tracked or passes validation.
async fn check_existing(track: &Track, existing: &Path, deps: &WorkerDeps) -> Option<TrackOutcome> {
    let size = std::fs::metadata(existing).ok()?.len();
    let skipped = TrackOutcome::Skipped {
        path: existing.to_path_buf(),
        size,
    };

    if deps.tracker.lock().await.is_downloaded(track, existing) {
        tracing::info!(path = %existing.display(), "Already downloaded");
        return Some(skipped);
    }

    if deps.validator.is_complete(existing, track).await {
        tracing::info!(path = %existing.display(), "File already exists and is complete");
        if let Err(e) = deps.tracker.lock().await.mark_downloaded(track, existing) {
            tracing::warn!(error = %e, "Could not update download tracker");
        }
        return Some(skipped);
    }
    None
}

/// An existing file moved out of the way while it is downloaded again.
///
/// Dropping it without [`SetAside::discard`] (failure or cancellation) moves
/// the file back.
struct SetAside {
    original: PathBuf,
    backup: PathBuf,
    restore: bool,
}

impl SetAside {
    fn new(original: PathBuf) -> Result<Self, DownloadError> {
        let mut backup = original.clone().into_os_string();
        backup.push(".old");
        let backup = PathBuf::from(backup);
        std::fs::rename(&original, &backup)?;
        Ok(Self {
            original,
            backup,
            restore: true,
        })
    }

    /// The replacement succeeded; delete the old copy.
    fn discard(mut self) {
        self.restore = false;
        remove_file_quietly(&self.backup);
    }
}

impl Drop for SetAside {
    fn drop(&mut self) {
        if !self.restore {
            return;
        }
        match std::fs::rename(&self.backup, &self.original) {
            Ok(()) => {
                tracing::info!(path = %self.original.display(), "Kept existing file after failed re-download");
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.backup.display(),
                    error = %e,
                    "Could not restore existing file"
                );
            }
        }
    }
}

fn remove_file_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::debug!(path = %path.display(), error = %e, "Could not remove file");
    }
}

/// Remove leftovers of an interrupted download (`<stem>.*.part`, `.ytdl`).
fn remove_partial_files(destination: &DownloadDestination) {
    let Ok(entries) = std::fs::read_dir(&destination.dir) else {
        return;
    };
    let prefix = format!("{}.", destination.stem);
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&prefix)
            && (name.ends_with(".part") || name.ends_with(".ytdl"))
        {
            remove_file_quietly(&entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_aside_restores_unless_discarded() {
        let temp = tempfile::tempdir().unwrap();
        let original = temp.path().join("01 - Song.flac");
        std::fs::write(&original, b"old").unwrap();

        let aside = SetAside::new(original.clone()).unwrap();
        assert!(!original.exists());
        assert!(temp.path().join("01 - Song.flac.old").exists());
        drop(aside);
        assert_eq!(std::fs::read(&original).unwrap(), b"old");

        let aside = SetAside::new(original.clone()).unwrap();
        std::fs::write(&original, b"new").unwrap();
        aside.discard();
        assert_eq!(std::fs::read(&original).unwrap(), b"new");
        assert!(!temp.path().join("01 - Song.flac.old").exists());
    }

    #[test]
    fn test_remove_partial_files() {
        let temp = tempfile::tempdir().unwrap();
        let destination = DownloadDestination::new(temp.path(), "01 - Song");
        for name in ["01 - Song.flac.part", "01 - Song.webm.ytdl", "01 - Song.mp3", "other.part"] {
            std::fs::write(temp.path().join(name), b"x").unwrap();
        }

        remove_partial_files(&destination);

        assert!(!temp.path().join("01 - Song.flac.part").exists());
        assert!(!temp.path().join("01 - Song.webm.ytdl").exists());
        assert!(temp.path().join("01 - Song.mp3").exists());
        assert!(temp.path().join("other.part").exists());
    }
}
