//! Spotify Web API resolver: links to track metadata.

mod auth;
mod link;
mod models;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use spdl_core::{ResolveError, Track};
use url::Url;

use crate::config::{
    SPOTIFY_CLIENT_ID_ENV, SPOTIFY_CLIENT_SECRET_ENV, SourcesConfig, SpotifyCredentials,
};
use crate::error::SourceError;
use crate::http::{HttpBackend, ReqwestBackend};
use auth::TokenCache;
pub use link::{SpotifyLink, SpotifyLinkKind};
use models::{AlbumObject, Paging, PlaylistItem, TrackObject};

const API_BASE: &str = "https://api.spotify.com/v1";

/// Page size for album and playlist listings.
const PAGE_LIMIT: u32 = 50;

/// Resolves Spotify links into tracks.
pub struct SpotifyResolver<B = ReqwestBackend> {
    http: Arc<B>,
    credentials: Option<SpotifyCredentials>,
    token: TokenCache,
}

impl SpotifyResolver {
    /// Create a resolver with its own HTTP client.
    pub fn new(config: &SourcesConfig) -> Result<Self, ResolveError> {
        let http = ReqwestBackend::new(config)?;
        Ok(Self::with_backend(Arc::new(http), config.spotify.clone()))
    }
}

impl<B: HttpBackend> SpotifyResolver<B> {
    pub(crate) fn with_backend(http: Arc<B>, credentials: Option<SpotifyCredentials>) -> Self {
        Self {
            http,
            credentials,
            token: TokenCache::default(),
        }
    }

    /// Whether credentials are configured.
    pub const fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    async fn get<T: DeserializeOwned + Send>(&self, url: &Url) -> Result<T, ResolveError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ResolveError::MissingCredentials(format!(
                "{SPOTIFY_CLIENT_ID_ENV} and {SPOTIFY_CLIENT_SECRET_ENV}"
            ))
        })?;
        let token = self
            .token
            .get(self.http.as_ref(), credentials)
            .await
            .map_err(|e| match e {
                SourceError::HttpStatus {
                    status: 400 | 401, ..
                } => ResolveError::Auth("Spotify rejected the client credentials".to_string()),
                other => other.into(),
            })?;
        Ok(self.http.get_json_authorized(url, &token).await?)
    }

    /// Resolve a link into tracks in listing order.
    pub(crate) async fn resolve_link(&self, link: &SpotifyLink) -> Result<Vec<Track>, ResolveError> {
        tracing::info!(kind = %link.kind, id = %link.id, "Resolving Spotify link");
        let tracks = match link.kind {
            SpotifyLinkKind::Track => {
                let url = api_url(&format!("tracks/{}", link.id))?;
                let track: TrackObject = self.get(&url).await?;
                vec![track.into_track(None)]
            }
            SpotifyLinkKind::Album => self.album_tracks(&link.id).await?,
            SpotifyLinkKind::Playlist => self.playlist_tracks(&link.id).await?,
        };
        tracing::info!(count = tracks.len(), "Resolved Spotify link");
        Ok(tracks)
    }

    async fn album_tracks(&self, id: &str) -> Result<Vec<Track>, ResolveError> {
        let album: AlbumObject = self.get(&api_url(&format!("albums/{id}"))?).await?;
        let album_name = album.name;

        let mut tracks: Vec<Track> = album
            .tracks
            .items
            .into_iter()
            .filter(|t| !t.is_local)
            .map(|t| t.into_track(Some(&album_name)))
            .collect();

        let mut next = album.tracks.next;
        while let Some(page_url) = next {
            let page: Paging<TrackObject> = self.get(&Url::parse(&page_url).map_err(source_err)?).await?;
            tracks.extend(
                page.items
                    .into_iter()
                    .filter(|t| !t.is_local)
                    .map(|t| t.into_track(Some(&album_name))),
            );
            next = page.next;
        }
        Ok(tracks)
    }

    async fn playlist_tracks(&self, id: &str) -> Result<Vec<Track>, ResolveError> {
        let mut url = api_url(&format!("playlists/{id}/tracks"))?;
        url.query_pairs_mut()
            .append_pair("limit", &PAGE_LIMIT.to_string());

        let mut tracks = Vec::new();
        let mut next = Some(url);
        while let Some(page_url) = next {
            let page: Paging<PlaylistItem> = self.get(&page_url).await?;
            tracks.extend(
                page.items
                    .into_iter()
                    .filter(|item| !item.is_local)
                    .filter_map(|item| item.track)
                    .filter(|t| !t.is_local)
                    .map(|t| t.into_track(None)),
            );
            next = page
                .next
                .map(|n| Url::parse(&n))
                .transpose()
                .map_err(source_err)?;
        }
        Ok(tracks)
    }
}

fn api_url(path: &str) -> Result<Url, ResolveError> {
    Url::parse(&format!("{API_BASE}/{path}")).map_err(source_err)
}

fn source_err(e: impl Into<SourceError>) -> ResolveError {
    e.into().into()
}
