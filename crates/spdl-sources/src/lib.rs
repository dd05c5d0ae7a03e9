//! Audio source and track resolver adapters for spotify-downloader.
//!
//! Each source implements `spdl_core::AudioSourcePort`:
//!
//! - [`InternetArchiveSource`] - free, legal FLAC from archive.org
//! - [`JamendoSource`] - Creative Commons tracks from Jamendo
//! - [`YoutubeSource`] - anything else, through `yt-dlp`
//!
//! [`SpotifyResolver`] implements `spdl_core::TrackResolverPort` and turns
//! Spotify links into track metadata.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// The HTTP backend generic is an implementation detail of the public aliases
#![allow(private_interfaces, private_bounds)]

mod config;
mod error;
mod http;
mod internet_archive;
mod jamendo;
mod matching;
mod port;
mod spotify;
mod youtube;

// ============================================================================
// Public API
// ============================================================================

pub use config::{
    DEFAULT_JAMENDO_CLIENT_ID, JAMENDO_CLIENT_ID_ENV, SPOTIFY_CLIENT_ID_ENV,
    SPOTIFY_CLIENT_SECRET_ENV, SourcesConfig, SpotifyCredentials, YTDLP_PATH_ENV, YoutubeOptions,
};
pub use internet_archive::InternetArchiveSource;
pub use jamendo::JamendoSource;
pub use port::build_audio_sources;
pub use spotify::{SpotifyLink, SpotifyLinkKind, SpotifyResolver};
pub use youtube::{YTDLP_PROGRAM, YoutubeSource, locate_ytdlp};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
