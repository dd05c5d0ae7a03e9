//! Spotify link parsing.

use std::fmt;

use url::Url;

/// What a Spotify link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotifyLinkKind {
    Track,
    Album,
    Playlist,
}

impl SpotifyLinkKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Playlist => "playlist",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "track" => Some(Self::Track),
            "album" => Some(Self::Album),
            "playlist" => Some(Self::Playlist),
            _ => None,
        }
    }
}

impl fmt::Display for SpotifyLinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `open.spotify.com` URL or `spotify:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyLink {
    pub kind: SpotifyLinkKind,
    pub id: String,
}

impl SpotifyLink {
    /// Parse a web URL (query ignored, optional `intl-xx` segment) or a URI.
    ///
    /// ```
    /// use spdl_sources::{SpotifyLink, SpotifyLinkKind};
    ///
    /// let link = SpotifyLink::parse("https://open.spotify.com/intl-de/album/1DFixLWuPkv3KT3TnV35m3?si=x").unwrap();
    /// assert_eq!(link.kind, SpotifyLinkKind::Album);
    /// assert_eq!(link.id, "1DFixLWuPkv3KT3TnV35m3");
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(rest) = input.strip_prefix("spotify:") {
            let (kind, id) = rest.split_once(':')?;
            return Self::build(kind, id);
        }

        let with_scheme = if input.starts_with("open.spotify.com") {
            format!("https://{input}")
        } else {
            input.to_string()
        };
        let url = Url::parse(&with_scheme).ok()?;
        if url.host_str() != Some("open.spotify.com") {
            return None;
        }

        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
        let mut kind = segments.next()?;
        if kind.starts_with("intl-") {
            kind = segments.next()?;
        }
        Self::build(kind, segments.next()?)
    }

    fn build(kind: &str, id: &str) -> Option<Self> {
        let kind = SpotifyLinkKind::parse(kind)?;
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self {
            kind,
            id: id.to_string(),
        })
    }

    /// Canonical web URL.
    pub fn web_url(&self) -> String {
        format!("https://open.spotify.com/{}/{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_web_urls() {
        let track = SpotifyLink::parse("https://open.spotify.com/track/63OQupATfueTdZMWTxW03A?si=abc").unwrap();
        assert_eq!(track.kind, SpotifyLinkKind::Track);
        assert_eq!(track.id, "63OQupATfueTdZMWTxW03A");

        let playlist = SpotifyLink::parse("open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M").unwrap();
        assert_eq!(playlist.kind, SpotifyLinkKind::Playlist);

        let intl = SpotifyLink::parse("https://open.spotify.com/intl-fr/track/abc123").unwrap();
        assert_eq!(intl.id, "abc123");
        assert_eq!(intl.web_url(), "https://open.spotify.com/track/abc123");
    }

    #[test]
    fn test_parse_uri() {
        let album = SpotifyLink::parse("spotify:album:1DFixLWuPkv3KT3TnV35m3").unwrap();
        assert_eq!(album.kind, SpotifyLinkKind::Album);
        assert_eq!(album.id, "1DFixLWuPkv3KT3TnV35m3");
    }

    #[test]
    fn test_rejects_other_input() {
        assert!(SpotifyLink::parse("Radiohead - Karma Police").is_none());
        assert!(SpotifyLink::parse("https://example.com/track/abc").is_none());
        assert!(SpotifyLink::parse("https://open.spotify.com/artist/abc").is_none());
        assert!(SpotifyLink::parse("spotify:track:").is_none());
        assert!(SpotifyLink::parse("tracks.json").is_none());
    }
}
