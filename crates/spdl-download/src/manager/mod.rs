//! Multi-source download with fallback.
//!
//! Sources are tried in priority order. Each source gets its own number of
//! search attempts (`AudioSourcePort::max_attempts`), with a random pause
//! before every retry. The first source that produces a file wins.

mod retry;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use spdl_core::{
    AudioSourcePort, DownloadDestination, DownloadError, DownloadEvent, DownloadEventEmitterPort,
    NoopDownloadEmitter, ProgressCallback, SourceKind, Track,
};

use crate::progress::ProgressThrottle;
pub use retry::RetryDelay;

/// A finished download and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDownload {
    pub source: SourceKind,
    pub path: PathBuf,
}

/// Downloads a track from the first source that has it.
pub struct MultiSourceDownloader {
    /// Enabled sources in priority order.
    sources: IndexMap<SourceKind, Arc<dyn AudioSourcePort>>,
    retry_delay: RetryDelay,
    emitter: Arc<dyn DownloadEventEmitterPort>,
}

impl MultiSourceDownloader {
    /// Order `sources` by `priority`. Sources missing from `priority` are dropped.
    pub fn new(sources: Vec<Arc<dyn AudioSourcePort>>, priority: &[SourceKind]) -> Self {
        let mut by_kind: IndexMap<SourceKind, Arc<dyn AudioSourcePort>> =
            sources.into_iter().map(|s| (s.kind(), s)).collect();

        let mut ordered = IndexMap::new();
        for kind in priority {
            if let Some(source) = by_kind.shift_remove(kind) {
                ordered.insert(*kind, source);
            }
        }
        for kind in by_kind.keys() {
            tracing::debug!(source = %kind, "Source not in priority list, ignoring");
        }

        tracing::info!(
            sources = ?ordered.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
            "Initialized download sources"
        );
        Self {
            sources: ordered,
            retry_delay: RetryDelay::default(),
            emitter: Arc::new(NoopDownloadEmitter::new()),
        }
    }

    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: RetryDelay) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Emit `SourceAttempt` and `TrackProgress` events to `emitter`.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<dyn DownloadEventEmitterPort>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Enabled sources in priority order.
    pub fn available_sources(&self) -> Vec<SourceKind> {
        self.sources.keys().copied().collect()
    }

    /// Whether `kind` is enabled.
    pub fn is_source_available(&self, kind: SourceKind) -> bool {
        self.sources.contains_key(&kind)
    }

    /// Check reachability of each enabled source.
    pub async fn check_sources(&self) -> Vec<(SourceKind, bool)> {
        let mut results = Vec::with_capacity(self.sources.len());
        for (kind, source) in &self.sources {
            results.push((*kind, source.is_available().await));
        }
        results
    }

    /// Download `track` to `destination`, falling back through the sources.
    pub async fn download(
        &self,
        track: &Track,
        destination: &DownloadDestination,
    ) -> Result<SourceDownload, DownloadError> {
        let mut attempted = Vec::new();

        for (kind, source) in &self.sources {
            attempted.push(*kind);
            tracing::info!(source = %kind, track = %track, "Trying source");

            match self.try_source(source.as_ref(), track, destination).await {
                Ok(Some(path)) => {
                    tracing::info!(source = %kind, path = %path.display(), "Downloaded");
                    return Ok(SourceDownload {
                        source: *kind,
                        path,
                    });
                }
                Ok(None) => tracing::info!(source = %kind, "Not found, trying next source"),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => tracing::warn!(source = %kind, error = %e, "Source failed, trying next"),
            }
        }

        tracing::error!(track = %track, "Failed to download from all sources");
        Err(DownloadError::AllSourcesFailed { attempted })
    }

    /// All attempts of one source. `Ok(None)` when nothing usable was found.
    async fn try_source(
        &self,
        source: &dyn AudioSourcePort,
        track: &Track,
        destination: &DownloadDestination,
    ) -> Result<Option<PathBuf>, DownloadError> {
        let kind = source.kind();
        let max_attempts = source.max_attempts().max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.retry_delay.sample();
                tracing::info!(
                    source = %kind,
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            self.emitter.emit(DownloadEvent::SourceAttempt {
                track: track.clone(),
                source: kind,
                attempt,
                max_attempts,
            });

            let candidate = match source.search_attempt(track, attempt).await {
                Ok(Some(candidate)) => candidate,
                Ok(None) => {
                    last_error = None;
                    continue;
                }
                Err(e @ (DownloadError::ToolMissing { .. } | DownloadError::Cancelled)) => {
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(source = %kind, attempt, error = %e, "Search failed");
                    last_error = Some(e);
                    continue;
                }
            };

            tracing::debug!(
                source = %kind,
                id = %candidate.id,
                title = %candidate.title,
                score = candidate.score,
                "Selected candidate"
            );

            let progress = self.progress_callback(track, kind);
            match source.download(&candidate, track, destination, progress).await {
                Ok(path) => return Ok(Some(path)),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    tracing::warn!(source = %kind, attempt, error = %e, "Download failed");
                    last_error = Some(e);
                }
            }
        }

        last_error.map_or(Ok(None), Err)
    }

    fn progress_callback(&self, track: &Track, source: SourceKind) -> ProgressCallback {
        let emitter = Arc::clone(&self.emitter);
        let track = track.clone();
        let throttle = Mutex::new(ProgressThrottle::default());

        Arc::new(move |downloaded, total| {
            let emit = throttle
                .lock()
                .map(|mut t| t.should_emit(downloaded, total))
                .unwrap_or(true);
            if emit {
                emitter.emit(DownloadEvent::TrackProgress {
                    track: track.clone(),
                    source,
                    downloaded,
                    total,
                });
            }
        })
    }
}
