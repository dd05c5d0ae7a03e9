//! Audio source port.
//!
//! One implementation per place audio can come from. The download manager
//! walks sources in priority order and only talks to them through this trait.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Track;
use crate::download::{DownloadDestination, DownloadError, SourceKind};

/// Byte progress callback: `(downloaded, total)`. `total` is 0 when unknown.
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// A progress callback that discards updates.
pub fn noop_progress() -> ProgressCallback {
    Arc::new(|_, _| {})
}

/// The best match a source found for a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCandidate {
    /// Source that produced the match.
    pub source: SourceKind,
    /// Source-specific identifier (archive identifier, Jamendo id, video id).
    pub id: String,
    /// Title as reported by the source.
    pub title: String,
    /// Artist/creator/channel as reported by the source.
    pub artist: String,
    /// Page or media URL.
    pub url: String,
    /// Match score; only candidates at or above the source threshold are returned.
    pub score: i32,
    /// Duration in seconds, when the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

/// Port for a single audio source.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait AudioSourcePort: Send + Sync {
    /// Which source this is.
    fn kind(&self) -> SourceKind;

    /// Find the best match for `track`, or `None` when nothing scores high enough.
    async fn search(&self, track: &Track) -> Result<Option<SourceCandidate>, DownloadError>;

    /// Search for a specific attempt (1-based).
    ///
    /// Sources that vary their query between attempts override this.
    async fn search_attempt(
        &self,
        track: &Track,
        attempt: u32,
    ) -> Result<Option<SourceCandidate>, DownloadError> {
        let _ = attempt;
        self.search(track).await
    }

    /// How many attempts the manager should make with this source.
    fn max_attempts(&self) -> u32 {
        1
    }

    /// Download `candidate` to `destination`, returning the written file.
    async fn download(
        &self,
        candidate: &SourceCandidate,
        track: &Track,
        destination: &DownloadDestination,
        progress: ProgressCallback,
    ) -> Result<PathBuf, DownloadError>;

    /// Cheap reachability check.
    async fn is_available(&self) -> bool;
}
