//! Core domain types for downloads.
//!
//! Pure data types shared by the download manager, the source adapters and
//! the CLI. Filesystem access is limited to `DownloadDestination`.

mod destination;
mod errors;
mod events;
mod summary;
mod types;

pub use destination::{AUDIO_EXTENSIONS, DownloadDestination, OrganizationOptions};
pub use errors::DownloadError;
pub use events::DownloadEvent;
pub use summary::{BatchSummary, FailedTrack, TrackOutcome};
pub use types::{AudioFormat, AudioQuality, DEFAULT_SOURCE_PRIORITY, SourceKind};
