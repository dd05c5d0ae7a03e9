//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or process types in any signature
//! - Source adapters report failures as `DownloadError`
//! - Repositories are load/save focused

pub mod audio_source;
pub mod download_event_emitter;
pub mod settings_repository;
pub mod track_resolver;

use thiserror::Error;

pub use audio_source::{AudioSourcePort, ProgressCallback, SourceCandidate, noop_progress};
pub use download_event_emitter::{DownloadEventEmitterPort, NoopDownloadEmitter};
pub use settings_repository::SettingsRepository;
pub use track_resolver::{ResolveError, TrackResolverPort};

#[cfg(feature = "test-utils")]
pub use audio_source::MockAudioSourcePort;
#[cfg(feature = "test-utils")]
pub use settings_repository::MockSettingsRepository;
#[cfg(feature = "test-utils")]
pub use track_resolver::MockTrackResolverPort;

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details and
/// provides a clean interface for callers to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error (filesystem).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Path resolution error.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),

    /// Download failed.
    #[error(transparent)]
    Download(#[from] crate::download::DownloadError),

    /// Track input could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Track list file could not be read.
    #[error(transparent)]
    TrackList(#[from] crate::domain::TrackListError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),
}
