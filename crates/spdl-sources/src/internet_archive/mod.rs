//! Internet Archive source: free, legal FLAC.
//!
//! Search uses the advanced search API restricted to audio collections with
//! FLAC files; download picks the first FLAC file of the best item.

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
use crate::matching::normalize;
use models::{ItemMetadata, SearchDoc, SearchResponse};

const SEARCH_URL: &str = "https://archive.org/advancedsearch.php";
const METADATA_URL: &str = "https://archive.org/metadata";
const DOWNLOAD_URL: &str = "https://archive.org/download";
const HOME_URL: &str = "https://archive.org";

/// Minimum score for a search hit to be used.
const MATCH_THRESHOLD: i32 = 60;

/// FLAC files declared smaller than this are samples or stubs, not tracks.
const MIN_FLAC_SIZE: u64 = 100_000;

/// Internet Archive audio source.
pub struct InternetArchiveSource<B = ReqwestBackend> {
    http: Arc<B>,
}

impl InternetArchiveSource {
    /// Create a source with its own HTTP client.
    pub fn new(config: &SourcesConfig) -> Result<Self, DownloadError> {
        Ok(Self::with_backend(Arc::new(ReqwestBackend::new(config)?)))
    }
}

impl<B: HttpBackend> InternetArchiveSource<B> {
    /// Create a source over an existing backend.
    pub(crate) const fn with_backend(http: Arc<B>) -> Self {
        Self { http }
    }

    /// Build the advanced search URL for a track.
    fn search_url(track: &Track) -> SourceResult<Url> {
        let query = format!(
            "({} AND {}) AND collection:(etree OR audio) AND format:FLAC",
            track.artist, track.name
        );
        Ok(Url::parse_with_params(
            SEARCH_URL,
            &[
                ("q", query.as_str()),
                ("fl[]", "identifier"),
                ("fl[]", "title"),
                ("fl[]", "creator"),
                ("fl[]", "date"),
                ("fl[]", "format"),
                ("rows", "5"),
                ("page", "1"),
                ("output", "json"),
            ],
        )?)
    }

    /// Search for the best matching item.
    pub(crate) async fn search_track(&self, track: &Track) -> SourceResult<Option<SourceCandidate>> {
        let url = Self::search_url(track)?;
        tracing::info!(track = %track, "Searching Internet Archive");

        let response: SearchResponse = self.http.get_json(&url).await?;
        let docs = response.response.docs;
        if docs.is_empty() {
            tracing::warn!(track = %track, "No results found on Internet Archive");
            return Ok(None);
        }

        let best = find_best_match(track, &docs).map(|(doc, score)| SourceCandidate {
            source: SourceKind::InternetArchive,
            id: doc.identifier.clone(),
            title: doc.title.first().unwrap_or_default().to_string(),
            artist: doc.creator.first().unwrap_or_default().to_string(),
            url: format!("{HOME_URL}/details/{}", doc.identifier),
            score,
            duration_secs: None,
        });

        if let Some(ref candidate) = best {
            tracing::info!(title = %candidate.title, score = candidate.score, "Found on Internet Archive");
        }
        Ok(best)
    }

    /// Download the first FLAC file of the item to `<destination>.flac`.
    pub(crate) async fn download_track(
        &self,
        candidate: &SourceCandidate,
        destination: &DownloadDestination,
        progress: ProgressCallback,
    ) -> SourceResult<PathBuf> {
        let identifier = candidate.id.as_str();
        let metadata_url = Url::parse(&format!("{METADATA_URL}/{identifier}"))?;
        let metadata: ItemMetadata = self.http.get_json(&metadata_url).await?;

        let file = metadata
            .files
            .iter()
            .filter(|f| f.is_flac())
            .find(|f| match f.declared_size() {
                Some(size) if size < MIN_FLAC_SIZE => {
                    tracing::debug!(file = %f.name, size, "Skipping undersized FLAC file");
                    false
                }
                _ => true,
            })
            .ok_or_else(|| SourceError::not_found(format!("No FLAC file found in {identifier}")))?;

        let download_url = Url::parse(&format!(
            "{DOWNLOAD_URL}/{identifier}/{}",
            encode_path(&file.name)
        ))?;

        std::fs::create_dir_all(&destination.dir)?;
        let dest = destination.path_with_extension("flac");

        tracing::info!(url = %download_url, "Downloading from Internet Archive");
        let downloaded = self.http.download(&download_url, &dest, None, progress).await?;
        Ok(downloaded.path)
    }

    /// Whether archive.org answers.
    pub(crate) async fn is_available(&self) -> bool {
        match Url::parse(HOME_URL) {
            Ok(url) => matches!(self.http.status(&url).await, Ok(200)),
            Err(_) => false,
        }
    }
}

/// Encode each path segment of a file name inside an item.
fn encode_path(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Score a search hit against the wanted track.
fn score_doc(track: &Track, doc: &SearchDoc) -> i32 {
    let artist = normalize(&track.artist);
    let title = normalize(&track.name);
    let item_title = normalize(&doc.title.joined());
    let item_creator = normalize(&doc.creator.joined());

    let mut score = 0;
    if item_creator.contains(&artist) || item_title.contains(&artist) {
        score += 50;
    }
    if item_title.contains(&title) {
        score += 50;
    }
    if doc.format.contains_exact("Flac") {
        score += 20;
    }
    score
}

/// Highest scoring hit at or above the threshold. Ties keep the earlier hit.
fn find_best_match<'a>(track: &Track, docs: &'a [SearchDoc]) -> Option<(&'a SearchDoc, i32)> {
    let mut best: Option<(&SearchDoc, i32)> = None;
    for doc in docs {
        let score = score_doc(track, doc);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((doc, score));
        }
    }
    best.filter(|(_, score)| *score >= MATCH_THRESHOLD)
}
