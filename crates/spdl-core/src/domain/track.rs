//! Track metadata and track list loading.
//!
//! A `Track` is the unit of work for the whole application: it carries the
//! Spotify-side metadata that sources are matched against and that output
//! paths are derived from.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Album name used for tracks that were entered by hand.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

const fn default_track_number() -> u32 {
    1
}

/// Metadata for a single track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Track title.
    pub name: String,
    /// Primary artist.
    pub artist: String,
    /// Album title.
    pub album: String,
    /// Position on the album (1-based).
    #[serde(default = "default_track_number")]
    pub track_number: u32,
    /// Duration in milliseconds (0 when unknown).
    #[serde(default)]
    pub duration_ms: u64,
    /// Link back to the track on Spotify, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
}

impl Track {
    /// Create a track with the required fields.
    pub fn new(
        name: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            album: album.into(),
            track_number: 1,
            duration_ms: 0,
            spotify_url: None,
        }
    }

    /// Set the album position.
    #[must_use]
    pub const fn with_track_number(mut self, track_number: u32) -> Self {
        self.track_number = track_number;
        self
    }

    /// Set the duration in milliseconds.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the Spotify URL.
    #[must_use]
    pub fn with_spotify_url(mut self, url: impl Into<String>) -> Self {
        self.spotify_url = Some(url.into());
        self
    }

    /// Parse an ad-hoc `"Artist - Title"` query into a track.
    ///
    /// The album is set to [`UNKNOWN_ALBUM`] and the duration is unknown.
    pub fn parse_query(query: &str) -> Result<Self, TrackListError> {
        let (artist, title) = query
            .split_once(" - ")
            .ok_or_else(|| TrackListError::InvalidQuery(query.to_string()))?;

        let artist = artist.trim();
        let title = title.trim();
        if artist.is_empty() || title.is_empty() {
            return Err(TrackListError::InvalidQuery(query.to_string()));
        }

        Ok(Self::new(title, artist, UNKNOWN_ALBUM))
    }

    /// Human-readable `"Artist - Title"` label.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.name)
    }

    /// Duration in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Whether the duration is known.
    pub const fn has_duration(&self) -> bool {
        self.duration_ms > 0
    }

    /// Stable identity for bookkeeping (tracker entries, completion keys).
    ///
    /// Lowercase hex SHA-256 of `artist|name|album`.
    pub fn track_key(&self) -> String {
        let digest = Sha256::digest(format!("{}|{}|{}", self.artist, self.name, self.album));
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.name)
    }
}

/// Errors while reading track input.
#[derive(Debug, Error)]
pub enum TrackListError {
    /// The track list file could not be read.
    #[error("Failed to read track list {path}: {reason}")]
    Read { path: String, reason: String },

    /// The JSON did not match either accepted shape.
    #[error("Invalid track list JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A hand-written query was not in `Artist - Title` form.
    #[error("Expected \"Artist - Title\", got \"{0}\"")]
    InvalidQuery(String),
}

/// An ordered list of tracks to download.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackList {
    /// The tracks in download order.
    pub tracks: Vec<Track>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrackListShape {
    Bare(Vec<Track>),
    Wrapped { tracks: Vec<Track> },
}

impl TrackList {
    /// Create a list from tracks.
    pub const fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse a track list from JSON.
    ///
    /// Accepts either a bare array of tracks or an object with a `tracks` array.
    pub fn from_json_str(json: &str) -> Result<Self, TrackListError> {
        let shape: TrackListShape = serde_json::from_str(json)?;
        let tracks = match shape {
            TrackListShape::Bare(tracks) | TrackListShape::Wrapped { tracks } => tracks,
        };
        Ok(Self { tracks })
    }

    /// Load a track list from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TrackListError> {
        let contents = std::fs::read_to_string(path).map_err(|e| TrackListError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let list = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), count = list.len(), "Loaded track list");
        Ok(list)
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Append tracks, dropping exact duplicates (same track key).
    pub fn extend_unique(&mut self, tracks: impl IntoIterator<Item = Track>) {
        for track in tracks {
            let key = track.track_key();
            if !self.tracks.iter().any(|t| t.track_key() == key) {
                self.tracks.push(track);
            }
        }
    }
}

impl IntoIterator for TrackList {
    type Item = Track;
    type IntoIter = std::vec::IntoIter<Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let track = Track::new("Paranoid Android", "Radiohead", "OK Computer");
        assert_eq!(track.display_name(), "Radiohead - Paranoid Android");
        assert_eq!(track.to_string(), "Radiohead - Paranoid Android");
    }

    #[test]
    fn test_track_key_is_stable_and_distinct() {
        let a = Track::new("Song", "Artist", "Album");
        let b = Track::new("Song", "Artist", "Album").with_track_number(4);
        let c = Track::new("Song", "Artist", "Other Album");

        assert_eq!(a.track_key(), b.track_key());
        assert_ne!(a.track_key(), c.track_key());
        assert_eq!(a.track_key().len(), 64);
        assert!(a.track_key().chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_query() {
        let track = Track::parse_query("Daft Punk - One More Time").unwrap();
        assert_eq!(track.artist, "Daft Punk");
        assert_eq!(track.name, "One More Time");
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert!(!track.has_duration());
    }

    #[test]
    fn test_parse_query_keeps_later_dashes_in_title() {
        let track = Track::parse_query("Artist - Title - Remastered").unwrap();
        assert_eq!(track.artist, "Artist");
        assert_eq!(track.name, "Title - Remastered");
    }

    #[test]
    fn test_parse_query_rejects_missing_separator() {
        assert!(matches!(
            Track::parse_query("just a title"),
            Err(TrackListError::InvalidQuery(_))
        ));
        assert!(Track::parse_query(" - Title").is_err());
    }

    #[test]
    fn test_duration_secs() {
        let track = Track::new("a", "b", "c").with_duration_ms(215_500);
        assert!((track.duration_secs() - 215.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_track_list_bare_array() {
        let json = r#"[
            {"name": "One", "artist": "A", "album": "X", "track_number": 1, "duration_ms": 1000},
            {"name": "Two", "artist": "A", "album": "X"}
        ]"#;
        let list = TrackList::from_json_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.tracks[1].track_number, 1);
        assert_eq!(list.tracks[1].duration_ms, 0);
    }

    #[test]
    fn test_track_list_wrapped_object() {
        let json = r#"{"tracks": [{"name": "One", "artist": "A", "album": "X",
            "spotify_url": "https://open.spotify.com/track/abc"}]}"#;
        let list = TrackList::from_json_str(json).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.tracks[0].spotify_url.as_deref(),
            Some("https://open.spotify.com/track/abc")
        );
    }

    #[test]
    fn test_track_list_rejects_garbage() {
        assert!(matches!(
            TrackList::from_json_str(r#"{"songs": []}"#),
            Err(TrackListError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = TrackList::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(TrackListError::Read { .. })));
    }

    #[test]
    fn test_extend_unique() {
        let mut list = TrackList::default();
        list.extend_unique(vec![
            Track::new("One", "A", "X"),
            Track::new("One", "A", "X"),
            Track::new("Two", "A", "X"),
        ]);
        assert_eq!(list.len(), 2);
    }
}
