//! Core domain types and port definitions for spotify-downloader.
//!
//! This crate owns everything the adapters agree on:
//!
//! - `domain` - tracks and track lists
//! - `download` - sources, formats, outcomes, events and errors
//! - `ports` - trait seams implemented by `spdl-sources`, `spdl-download` and the CLI
//! - `settings` - persistent user preferences and their validation
//! - `paths` - data directory and download directory resolution
//! - `utils` - filename sanitizing/templating and human-readable formatting
//!
//! It performs no network I/O; filesystem access is limited to path checks.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod download;
pub mod paths;
pub mod ports;
pub mod settings;
pub mod utils;

// Re-export commonly used types for convenience
pub use domain::{Track, TrackList, TrackListError};
pub use download::{
    AudioFormat, AudioQuality, BatchSummary, DEFAULT_SOURCE_PRIORITY, DownloadDestination,
    DownloadError, DownloadEvent, FailedTrack, OrganizationOptions, SourceKind, TrackOutcome,
};
pub use ports::{
    AudioSourcePort, CoreError, DownloadEventEmitterPort, NoopDownloadEmitter, ProgressCallback,
    RepositoryError, ResolveError, SettingsRepository, SourceCandidate, TrackResolverPort,
    noop_progress,
};
pub use settings::{Settings, SettingsError, SettingsUpdate, validate_settings};

// Re-export path utilities
pub use paths::{
    DATA_DIR_ENV, DOWNLOAD_DIR_ENV, DirectoryCreationStrategy, DownloadDirResolution,
    DownloadDirSource, PathError, data_root, default_download_dir, ensure_directory,
    env_file_path, normalize_user_path, persist_env_value, resolve_download_dir, settings_path,
    verify_writable,
};
