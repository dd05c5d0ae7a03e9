//! Track resolver port.
//!
//! Turns a streaming-service link (track, album, playlist) into track
//! metadata. The Spotify adapter lives in `spdl-sources`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Track;

/// Errors from resolving a link into tracks.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The input is not a link this resolver understands.
    #[error("Unsupported link: {0}")]
    Unsupported(String),

    /// API credentials are missing.
    #[error("Missing credentials: set {0}")]
    MissingCredentials(String),

    /// Credentials were rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The linked item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered with an error.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure.
    #[error("Network error: {0}")]
    Network(String),
}

/// Port for resolving links into tracks.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait TrackResolverPort: Send + Sync {
    /// Whether `input` looks like a link this resolver handles.
    fn can_resolve(&self, input: &str) -> bool;

    /// Resolve `input` into tracks in listing order.
    async fn resolve(&self, input: &str) -> Result<Vec<Track>, ResolveError>;
}
