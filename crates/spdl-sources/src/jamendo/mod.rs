//! Jamendo source: Creative Commons music with FLAC downloads.

mod models;

use std::path::PathBuf;
use std::sync::Arc;

use spdl_core::{
    DownloadDestination, DownloadError, ProgressCallback, SourceCandidate, SourceKind, Track,
};
use url::Url;

use crate::config::SourcesConfig;
use crate::error::{SourceError, SourceResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::matching::{normalize, within_seconds};
use models::{JamendoTrack, TracksResponse};

const API_BASE: &str = "https://api.jamendo.com/v3.0";

/// Minimum score for a search hit to be used.
const MATCH_THRESHOLD: i32 = 60;

/// Files below this size are error pages or previews.
const MIN_FILE_SIZE: u64 = 100_000;

/// Jamendo audio source.
pub struct JamendoSource<B = ReqwestBackend> {
    http: Arc<B>,
    client_id: String,
}

impl JamendoSource {
    /// Create a source with its own HTTP client.
    pub fn new(config: &SourcesConfig) -> Result<Self, DownloadError> {
        Ok(Self::with_backend(
            Arc::new(ReqwestBackend::new(config)?),
            config.jamendo_client_id.clone(),
        ))
    }
}

impl<B: HttpBackend> JamendoSource<B> {
    /// Create a source over an existing backend.
    pub(crate) const fn with_backend(http: Arc<B>, client_id: String) -> Self {
        Self { http, client_id }
    }

    fn search_url(&self, track: &Track) -> SourceResult<Url> {
        let query = format!("{} {}", track.artist, track.name);
        Ok(Url::parse_with_params(
            &format!("{API_BASE}/tracks/"),
            &[
                ("client_id", self.client_id.as_str()),
                ("format", "json"),
                ("limit", "5"),
                ("search", query.as_str()),
                ("include", "musicinfo"),
                ("audioformat", "flac"),
            ],
        )?)
    }

    fn file_url(&self, id: &str) -> SourceResult<Url> {
        Ok(Url::parse_with_params(
            &format!("{API_BASE}/tracks/file/"),
            &[
                ("client_id", self.client_id.as_str()),
                ("id", id),
                ("audioformat", "flac"),
            ],
        )?)
    }

    /// Search for the best matching track.
    pub(crate) async fn search_track(&self, track: &Track) -> SourceResult<Option<SourceCandidate>> {
        let url = self.search_url(track)?;
        tracing::info!(track = %track, "Searching Jamendo");

        let response: TracksResponse = self.http.get_json(&url).await?;
        if !response.headers.is_success() {
            return Err(SourceError::invalid_response(format!(
                "Jamendo error {}: {}",
                response.headers.code, response.headers.error_message
            )));
        }
        if response.results.is_empty() {
            tracing::warn!(track = %track, "No results found on Jamendo");
            return Ok(None);
        }

        let best = find_best_match(track, &response.results).map(|(hit, score)| SourceCandidate {
            source: SourceKind::Jamendo,
            id: hit.id.clone(),
            title: hit.name.clone(),
            artist: hit.artist_name.clone(),
            url: hit
                .shareurl
                .clone()
                .unwrap_or_else(|| format!("https://www.jamendo.com/track/{}", hit.id)),
            score,
            duration_secs: hit.duration,
        });

        if let Some(ref candidate) = best {
            tracing::info!(
                title = %candidate.title,
                artist = %candidate.artist,
                score = candidate.score,
                "Found on Jamendo"
            );
        }
        Ok(best)
    }

    /// Download the FLAC file to `<destination>.flac`.
    pub(crate) async fn download_track(
        &self,
        candidate: &SourceCandidate,
        destination: &DownloadDestination,
        progress: ProgressCallback,
    ) -> SourceResult<PathBuf> {
        let url = self.file_url(&candidate.id)?;
        std::fs::create_dir_all(&destination.dir)?;
        let dest = destination.path_with_extension("flac");

        tracing::info!(id = %candidate.id, "Downloading from Jamendo");
        let downloaded = self.http.download(&url, &dest, Some("audio"), progress).await?;

        if downloaded.bytes < MIN_FILE_SIZE {
            tracing::warn!(bytes = downloaded.bytes, "Jamendo file too small, removing");
            let _ = tokio::fs::remove_file(&downloaded.path).await;
            return Err(SourceError::TooSmall {
                size: downloaded.bytes,
            });
        }
        Ok(downloaded.path)
    }

    /// Whether the tracks endpoint answers for our client id.
    pub(crate) async fn is_available(&self) -> bool {
        let url = Url::parse_with_params(
            &format!("{API_BASE}/tracks/"),
            &[("client_id", self.client_id.as_str()), ("limit", "1")],
        );
        match url {
            Ok(url) => matches!(self.http.status(&url).await, Ok(200)),
            Err(_) => false,
        }
    }
}

/// Exact match scores 50, containment either way 30.
fn field_score(wanted: &str, found: &str) -> i32 {
    if found.is_empty() || wanted.is_empty() {
        0
    } else if wanted == found {
        50
    } else if found.contains(wanted) || wanted.contains(found) {
        30
    } else {
        0
    }
}

fn score_hit(track: &Track, hit: &JamendoTrack) -> i32 {
    let mut score = field_score(&normalize(&track.artist), &normalize(&hit.artist_name))
        + field_score(&normalize(&track.name), &normalize(&hit.name));

    if track.has_duration() {
        if let Some(duration) = hit.duration {
            if within_seconds(track.duration_secs(), duration, 10.0) {
                score += 20;
            }
        }
    }
    score
}

/// Highest scoring hit at or above the threshold. Ties keep the earlier hit.
fn find_best_match<'a>(track: &Track, hits: &'a [JamendoTrack]) -> Option<(&'a JamendoTrack, i32)> {
    let mut best: Option<(&JamendoTrack, i32)> = None;
    for hit in hits {
        let score = score_hit(track, hit);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((hit, score));
        }
    }
    best.filter(|(_, score)| *score >= MATCH_THRESHOLD)
}
