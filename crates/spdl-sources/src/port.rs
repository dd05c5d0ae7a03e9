//! Port trait implementations for the source adapters.
//!
//! Implements the core-owned `AudioSourcePort` and `TrackResolverPort`
//! traits and converts internal `SourceError`s at the boundary.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use spdl_core::{
    AudioSourcePort, DownloadDestination, DownloadError, ProgressCallback, ResolveError,
    SourceCandidate, SourceKind, Track, TrackResolverPort,
};

use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::internet_archive::InternetArchiveSource;
use crate::jamendo::JamendoSource;
use crate::spotify::{SpotifyLink, SpotifyResolver};
use crate::youtube::{self, YoutubeSource};

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `SourceError` to core `DownloadError`.
fn map_download_error(err: SourceError) -> DownloadError {
    match err {
        SourceError::HttpStatus { status: 404, url } => {
            DownloadError::not_found(format!("Nothing at {url}"))
        }
        SourceError::HttpStatus { status, url } => DownloadError::network_with_status(
            format!("Request failed with status {status}: {url}"),
            status,
        ),
        SourceError::InvalidResponse { message } => DownloadError::invalid_response(message),
        SourceError::NotFound { message } => DownloadError::not_found(message),
        SourceError::NotAudio { content_type } => DownloadError::not_found(format!(
            "Track not available as audio (server sent '{content_type}')"
        )),
        SourceError::TooSmall { size } => {
            DownloadError::incomplete(format!("File too small ({size} bytes), probably not valid"))
        }
        SourceError::ToolMissing { tool } => DownloadError::tool_missing(tool),
        SourceError::Process { tool, message } => DownloadError::process_failed(tool, message),
        SourceError::Network(e) => match e.status() {
            Some(status) => DownloadError::network_with_status(e.to_string(), status.as_u16()),
            None => DownloadError::network(e.to_string()),
        },
        SourceError::InvalidUrl(e) => DownloadError::other(format!("Invalid URL: {e}")),
        SourceError::JsonParse(e) => DownloadError::invalid_response(e.to_string()),
        SourceError::Io(e) => DownloadError::from_io_error(&e),
    }
}

/// Convert internal `SourceError` to core `ResolveError`.
fn map_resolve_error(err: SourceError) -> ResolveError {
    match err {
        SourceError::HttpStatus { status: 404, url } => ResolveError::NotFound(url),
        SourceError::HttpStatus {
            status: status @ (401 | 403),
            url,
        } => ResolveError::Auth(format!("status {status} for {url}")),
        SourceError::HttpStatus { status, url } => ResolveError::Api {
            status,
            message: url,
        },
        SourceError::Network(e) => ResolveError::Network(e.to_string()),
        SourceError::NotFound { message } => ResolveError::NotFound(message),
        SourceError::InvalidUrl(e) => ResolveError::Unsupported(e.to_string()),
        other => ResolveError::Api {
            status: 0,
            message: other.to_string(),
        },
    }
}

impl From<SourceError> for DownloadError {
    fn from(err: SourceError) -> Self {
        map_download_error(err)
    }
}

impl From<SourceError> for ResolveError {
    fn from(err: SourceError) -> Self {
        map_resolve_error(err)
    }
}

// ============================================================================
// AudioSourcePort Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend + 'static> AudioSourcePort for InternetArchiveSource<B> {
    fn kind(&self) -> SourceKind {
        SourceKind::InternetArchive
    }

    async fn search(&self, track: &Track) -> Result<Option<SourceCandidate>, DownloadError> {
        Ok(self.search_track(track).await?)
    }

    async fn download(
        &self,
        candidate: &SourceCandidate,
        _track: &Track,
        destination: &DownloadDestination,
        progress: ProgressCallback,
    ) -> Result<PathBuf, DownloadError> {
        Ok(self.download_track(candidate, destination, progress).await?)
    }

    async fn is_available(&self) -> bool {
        InternetArchiveSource::is_available(self).await
    }
}

#[async_trait]
impl<B: HttpBackend + 'static> AudioSourcePort for JamendoSource<B> {
    fn kind(&self) -> SourceKind {
        SourceKind::Jamendo
    }

    async fn search(&self, track: &Track) -> Result<Option<SourceCandidate>, DownloadError> {
        Ok(self.search_track(track).await?)
    }

    async fn download(
        &self,
        candidate: &SourceCandidate,
        _track: &Track,
        destination: &DownloadDestination,
        progress: ProgressCallback,
    ) -> Result<PathBuf, DownloadError> {
        Ok(self.download_track(candidate, destination, progress).await?)
    }

    async fn is_available(&self) -> bool {
        JamendoSource::is_available(self).await
    }
}

#[async_trait]
impl AudioSourcePort for YoutubeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Youtube
    }

    async fn search(&self, track: &Track) -> Result<Option<SourceCandidate>, DownloadError> {
        self.search_attempt(track, 1).await
    }

    async fn search_attempt(
        &self,
        track: &Track,
        attempt: u32,
    ) -> Result<Option<SourceCandidate>, DownloadError> {
        Ok(self.search_track(track, attempt).await?)
    }

    fn max_attempts(&self) -> u32 {
        youtube::MAX_ATTEMPTS
    }

    async fn download(
        &self,
        candidate: &SourceCandidate,
        _track: &Track,
        destination: &DownloadDestination,
        progress: ProgressCallback,
    ) -> Result<PathBuf, DownloadError> {
        Ok(self.download_track(candidate, destination, progress).await?)
    }

    async fn is_available(&self) -> bool {
        Self::is_available(self).await
    }
}

// ============================================================================
// TrackResolverPort Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + 'static> TrackResolverPort for SpotifyResolver<B> {
    fn can_resolve(&self, input: &str) -> bool {
        SpotifyLink::parse(input).is_some()
    }

    async fn resolve(&self, input: &str) -> Result<Vec<Track>, ResolveError> {
        let link = SpotifyLink::parse(input)
            .ok_or_else(|| ResolveError::Unsupported(input.to_string()))?;
        self.resolve_link(&link).await
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Build the audio sources for `kinds`, sharing one HTTP client.
///
/// Sources are returned in the order given.
pub fn build_audio_sources(
    config: &SourcesConfig,
    kinds: &[SourceKind],
) -> Result<Vec<Arc<dyn AudioSourcePort>>, DownloadError> {
    let http = Arc::new(ReqwestBackend::new(config)?);
    let sources = kinds
        .iter()
        .map(|kind| -> Arc<dyn AudioSourcePort> {
            match kind {
                SourceKind::InternetArchive => {
                    Arc::new(InternetArchiveSource::with_backend(Arc::clone(&http)))
                }
                SourceKind::Jamendo => Arc::new(JamendoSource::with_backend(
                    Arc::clone(&http),
                    config.jamendo_client_id.clone(),
                )),
                SourceKind::Youtube => Arc::new(YoutubeSource::new(config)),
            }
        })
        .collect();
    Ok(sources)
}
