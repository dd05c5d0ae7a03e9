//! Destination path planning for track downloads.

use std::path::{Path, PathBuf};

use super::errors::DownloadError;
use crate::domain::Track;
use crate::utils::{FilenameFields, render_filename, sanitize_filename};

/// File extensions a finished download can have.
pub const AUDIO_EXTENSIONS: [&str; 6] = ["flac", "mp3", "m4a", "opus", "ogg", "wav"];

/// How finished files are laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationOptions {
    /// Base output directory.
    pub output_dir: PathBuf,
    /// Put files under `<artist>/<album>/`.
    pub organize_by_artist: bool,
    /// Filename template without extension.
    pub filename_format: String,
}

/// A planned download destination: a directory plus a file stem.
///
/// The extension is chosen by whichever source delivers the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDestination {
    /// Directory the file is written into.
    pub dir: PathBuf,
    /// File name without extension.
    pub stem: String,
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

impl DownloadDestination {
    /// Plan where `track` should be written.
    ///
    /// All path components are sanitized before use.
    pub fn plan(options: &OrganizationOptions, track: &Track) -> Result<Self, DownloadError> {
        let artist = non_empty(sanitize_filename(&track.artist), "Unknown Artist");
        let album = non_empty(sanitize_filename(&track.album), "Unknown Album");
        let title = non_empty(sanitize_filename(&track.name), "Unknown Title");

        let dir = if options.organize_by_artist {
            options.output_dir.join(&artist).join(&album)
        } else {
            options.output_dir.clone()
        };

        let fields = FilenameFields {
            artist: &artist,
            title: &title,
            album: &album,
            track_number: track.track_number,
        };
        let rendered = render_filename(&options.filename_format, &fields)
            .map_err(|e| DownloadError::other(format!("Invalid filename format: {e}")))?;
        let stem = non_empty(sanitize_filename(&rendered), "track");

        Ok(Self { dir, stem })
    }

    /// Create a destination from explicit parts.
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    /// Full path for the given extension (without the leading dot).
    pub fn path_with_extension(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", self.stem))
    }

    /// Path without extension, used as an output template prefix.
    pub fn stem_path(&self) -> PathBuf {
        self.dir.join(&self.stem)
    }

    /// First existing file for this destination with a known audio extension.
    pub fn find_existing(&self) -> Option<PathBuf> {
        AUDIO_EXTENSIONS
            .iter()
            .map(|ext| self.path_with_extension(ext))
            .find(|p| p.is_file())
    }

    /// Ensure the destination directory exists, creating it if necessary.
    pub fn ensure_dir(&self) -> Result<(), DownloadError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)
                .map_err(|e| DownloadError::io("create_dir", e.to_string()))?;
        }
        Ok(())
    }

    /// Directory the file is written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
