//! Spotify Web API response types (only the fields we read).

use serde::Deserialize;
use spdl_core::Track;
use spdl_core::domain::UNKNOWN_ALBUM;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

const fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paging<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Full or simplified track object.
#[derive(Debug, Deserialize)]
pub struct TrackObject {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub is_local: bool,
}

impl TrackObject {
    /// Convert into a domain track. `album_name` wins over the embedded album.
    pub fn into_track(self, album_name: Option<&str>) -> Track {
        let artist = self
            .artists
            .into_iter()
            .next()
            .map_or_else(|| "Unknown Artist".to_string(), |a| a.name);
        let album = album_name
            .map(str::to_string)
            .or_else(|| self.album.map(|a| a.name))
            .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

        let mut track = Track::new(self.name, artist, album)
            .with_track_number(self.track_number.unwrap_or(1))
            .with_duration_ms(self.duration_ms.unwrap_or(0));
        if let Some(url) = self.external_urls.spotify {
            track = track.with_spotify_url(url);
        }
        track
    }
}

#[derive(Debug, Deserialize)]
pub struct AlbumObject {
    pub name: String,
    pub tracks: Paging<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
    #[serde(default)]
    pub is_local: bool,
}
