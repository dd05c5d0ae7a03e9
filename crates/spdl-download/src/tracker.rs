//! Record of completed downloads per output directory.
//!
//! Stored as `.download_tracker.json` next to the music, keyed by
//! `Track::track_key()`. A missing or corrupt file starts an empty tracker.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use spdl_core::{DownloadError, Track};

/// Tracker file name inside the output directory.
pub const TRACKER_FILE_NAME: &str = ".download_tracker.json";

/// One completed download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEntry {
    pub artist: String,
    pub name: String,
    pub album: String,
    pub file: String,
    pub size: u64,
    pub format: String,
}

/// Totals for the `stats` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub total_downloaded: usize,
    /// Count per file extension.
    pub formats: BTreeMap<String, usize>,
}

/// Completed downloads for one output directory.
#[derive(Debug)]
pub struct DownloadTracker {
    path: PathBuf,
    entries: IndexMap<String, TrackerEntry>,
}

impl DownloadTracker {
    /// Load the tracker of `output_dir`.
    pub fn load(output_dir: &Path) -> Self {
        let path = output_dir.join(TRACKER_FILE_NAME);
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt download tracker, starting empty");
                IndexMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read download tracker");
                IndexMap::new()
            }
        };
        Self { path, entries }
    }

    /// Path of the tracker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, track: &Track) -> Option<&TrackerEntry> {
        self.entries.get(&track.track_key())
    }

    /// Whether `file` exists and matches the size recorded for `track`.
    pub fn is_downloaded(&self, track: &Track, file: &Path) -> bool {
        let Ok(metadata) = std::fs::metadata(file) else {
            return false;
        };
        match self.get(track) {
            Some(entry) if entry.size == metadata.len() => {
                tracing::debug!(track = %track, "Track found in tracker");
                true
            }
            Some(entry) => {
                tracing::warn!(
                    track = %track,
                    tracked = entry.size,
                    actual = metadata.len(),
                    "File size mismatch, will re-download"
                );
                false
            }
            None => false,
        }
    }

    /// Record `file` as the completed download of `track` and save.
    pub fn mark_downloaded(&mut self, track: &Track, file: &Path) -> Result<(), DownloadError> {
        let size = std::fs::metadata(file)?.len();
        let format = file
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        self.entries.insert(
            track.track_key(),
            TrackerEntry {
                artist: track.artist.clone(),
                name: track.name.clone(),
                album: track.album.clone(),
                file: file.display().to_string(),
                size,
                format,
            },
        );
        self.save()?;
        tracing::debug!(track = %track, "Marked as downloaded");
        Ok(())
    }

    /// Forget `track`. Returns whether it was tracked.
    pub fn remove_track(&mut self, track: &Track) -> Result<bool, DownloadError> {
        if self.entries.shift_remove(&track.track_key()).is_some() {
            self.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn stats(&self) -> TrackerStats {
        let mut formats = BTreeMap::new();
        for entry in self.entries.values() {
            let format = if entry.format.is_empty() {
                "unknown".to_string()
            } else {
                entry.format.clone()
            };
            *formats.entry(format).or_insert(0) += 1;
        }
        TrackerStats {
            total_downloaded: self.entries.len(),
            formats,
        }
    }

    /// Write the tracker atomically (temp file in the same directory, then rename).
    fn save(&self) -> Result<(), DownloadError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| DownloadError::other(format!("Failed to serialize tracker: {e}")))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| DownloadError::from_io_error(&e.error))?;
        Ok(())
    }
}
