//! `failed_tracks.json`: tracks to re-run with the `retry` command.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spdl_core::{DownloadError, FailedTrack, Track};

/// File name inside the output directory.
pub const FAILED_TRACKS_FILE_NAME: &str = "failed_tracks.json";

/// Failed tracks of the last batch in one output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTracksFile {
    pub saved_at: DateTime<Utc>,
    pub tracks: Vec<FailedTrack>,
}

impl FailedTracksFile {
    pub fn new(tracks: Vec<FailedTrack>) -> Self {
        Self {
            saved_at: Utc::now(),
            tracks,
        }
    }

    /// Location for `output_dir`.
    pub fn path_in(output_dir: &Path) -> PathBuf {
        output_dir.join(FAILED_TRACKS_FILE_NAME)
    }

    /// Load the file of `output_dir`. A missing file is `Ok(None)`.
    ///
    /// A bare JSON array of failed tracks is accepted as well.
    pub fn load(output_dir: &Path) -> Result<Option<Self>, DownloadError> {
        let path = Self::path_in(output_dir);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if let Ok(file) = serde_json::from_str::<Self>(&contents) {
            return Ok(Some(file));
        }
        let tracks: Vec<FailedTrack> = serde_json::from_str(&contents).map_err(|e| {
            DownloadError::invalid_response(format!("{}: {e}", path.display()))
        })?;
        Ok(Some(Self {
            saved_at: Utc::now(),
            tracks,
        }))
    }

    /// Write to `output_dir`, replacing any previous file.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf, DownloadError> {
        std::fs::create_dir_all(output_dir)?;
        let path = Self::path_in(output_dir);
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| DownloadError::other(format!("Failed to serialize failed tracks: {e}")))?;

        let mut tmp = tempfile::NamedTempFile::new_in(output_dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&path)
            .map_err(|e| DownloadError::from_io_error(&e.error))?;
        Ok(path)
    }

    /// Remove the file of `output_dir` if present.
    pub fn remove(output_dir: &Path) -> Result<(), DownloadError> {
        match std::fs::remove_file(Self::path_in(output_dir)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Tracks to download again.
    pub fn to_tracks(&self) -> Vec<Track> {
        self.tracks.iter().map(FailedTrack::to_track).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(name: &str) -> FailedTrack {
        FailedTrack::new(
            &Track::new(name, "Artist", "Album").with_track_number(4),
            &DownloadError::not_found("nothing"),
        )
    }

    #[test]
    fn test_save_load_remove() {
        let temp = tempfile::tempdir().unwrap();
        assert!(FailedTracksFile::load(temp.path()).unwrap().is_none());

        let file = FailedTracksFile::new(vec![failed("One"), failed("Two")]);
        let path = file.save(temp.path()).unwrap();
        assert_eq!(path, temp.path().join(FAILED_TRACKS_FILE_NAME));

        let loaded = FailedTracksFile::load(temp.path()).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        let tracks = loaded.to_tracks();
        assert_eq!(tracks[0].name, "One");
        assert_eq!(tracks[1].track_number, 4);

        FailedTracksFile::remove(temp.path()).unwrap();
        assert!(!path.exists());
        FailedTracksFile::remove(temp.path()).unwrap();
    }

    #[test]
    fn test_load_bare_array() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(FAILED_TRACKS_FILE_NAME),
            r#"[{"name": "Song", "artist": "Artist", "album": "Album", "error": "boom"}]"#,
        )
        .unwrap();

        let loaded = FailedTracksFile::load(temp.path()).unwrap().unwrap();
        let tracks = loaded.to_tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].artist, "Artist");
        assert_eq!(tracks[0].track_number, 1);
    }

    #[test]
    fn test_load_garbage_is_error() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(FAILED_TRACKS_FILE_NAME), "nope").unwrap();
        assert!(FailedTracksFile::load(temp.path()).is_err());
    }
}
