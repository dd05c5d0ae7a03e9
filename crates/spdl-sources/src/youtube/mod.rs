//! YouTube source driven by the external `yt-dlp` program.
//!
//! Search runs a flat `ytsearch5:` query and scores the entries; download
//! extracts audio in the configured format into `<stem>.<extension>`.

mod args;
mod process;
mod protocol;
mod scoring;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use spdl_core::{DownloadDestination, ProgressCallback, SourceCandidate, SourceKind, Track};

use crate::config::{SourcesConfig, YoutubeOptions};
use crate::error::{SourceError, SourceResult};
use protocol::{parse_progress_line, parse_search_output};
use scoring::{find_best_match, query_for_attempt};

/// Program name looked up on `PATH`.
pub const YTDLP_PROGRAM: &str = "yt-dlp";

/// Number of search attempts (each with a different query).
pub(crate) const MAX_ATTEMPTS: u32 = 2;

/// Find the `yt-dlp` binary: an explicit path when it exists, else `PATH`.
pub fn locate_ytdlp(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        if let Ok(found) = which::which(path) {
            return Some(found);
        }
        tracing::warn!(path = %path.display(), "Configured yt-dlp not found, searching PATH");
    }
    which::which(YTDLP_PROGRAM).ok()
}

/// YouTube audio source.
pub struct YoutubeSource {
    binary: Option<PathBuf>,
    options: YoutubeOptions,
}

impl YoutubeSource {
    /// Create a source, locating `yt-dlp` once.
    pub fn new(config: &SourcesConfig) -> Self {
        Self::with_binary(
            locate_ytdlp(config.ytdlp_path.as_deref()),
            config.youtube.clone(),
        )
    }

    pub(crate) const fn with_binary(binary: Option<PathBuf>, options: YoutubeOptions) -> Self {
        Self { binary, options }
    }

    /// Resolved `yt-dlp` path, if installed.
    pub fn binary(&self) -> Option<&Path> {
        self.binary.as_deref()
    }

    fn require_binary(&self) -> SourceResult<&Path> {
        self.binary().ok_or_else(|| SourceError::ToolMissing {
            tool: YTDLP_PROGRAM.to_string(),
        })
    }

    /// Search with the query for the given 1-based attempt.
    pub(crate) async fn search_track(
        &self,
        track: &Track,
        attempt: u32,
    ) -> SourceResult<Option<SourceCandidate>> {
        let binary = self.require_binary()?;
        let query = query_for_attempt(track, attempt);
        tracing::info!(%query, attempt, "Searching YouTube");

        let stdout = process::run_capture(binary, &args::search_args(&query)).await?;
        let entries = parse_search_output(&stdout);
        if entries.is_empty() {
            tracing::warn!(%query, "No results found on YouTube");
            return Ok(None);
        }

        let best = find_best_match(track, &entries).map(|(entry, score)| SourceCandidate {
            source: SourceKind::Youtube,
            id: entry.id.clone(),
            title: entry.title.clone(),
            artist: entry.channel_name().to_string(),
            url: entry.watch_url(),
            score,
            duration_secs: entry.duration,
        });

        match best {
            Some(ref candidate) => {
                tracing::info!(title = %candidate.title, score = candidate.score, "Found on YouTube");
            }
            None => tracing::warn!(%query, "No YouTube result scored high enough"),
        }
        Ok(best)
    }

    /// Extract audio into `<destination>.<format extension>`.
    pub(crate) async fn download_track(
        &self,
        candidate: &SourceCandidate,
        destination: &DownloadDestination,
        progress: ProgressCallback,
    ) -> SourceResult<PathBuf> {
        let binary = self.require_binary()?;
        std::fs::create_dir_all(&destination.dir)?;

        let args = args::download_args(&candidate.url, &self.options, &destination.stem_path());
        tracing::info!(url = %candidate.url, format = %self.options.format, "Downloading from YouTube");

        process::run_streaming(binary, &args, |line| {
            if let Some((downloaded, total)) = parse_progress_line(line) {
                progress(downloaded, total);
            } else {
                tracing::trace!(line, "yt-dlp");
            }
        })
        .await?;

        let expected = destination.path_with_extension(self.options.format.extension());
        if expected.exists() {
            Ok(expected)
        } else {
            Err(SourceError::not_found(format!(
                "yt-dlp finished but {} is missing",
                expected.display()
            )))
        }
    }

    /// Whether `yt-dlp` is installed and runs.
    pub(crate) async fn is_available(&self) -> bool {
        match self.binary() {
            Some(binary) => process::run_capture(binary, &[OsString::from("--version")])
                .await
                .is_ok(),
            None => false,
        }
    }
}
