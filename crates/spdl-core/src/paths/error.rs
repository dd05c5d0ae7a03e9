//! Errors from locating the download folder and the settings files.

use std::path::PathBuf;
use thiserror::Error;

/// Why a download folder, the data root or the `.env` file could not be used.
#[derive(Debug, Error)]
pub enum PathError {
    /// `~` was used in a path but there is no home directory to expand it to.
    #[error("Cannot expand '~': no home directory for the current user")]
    NoHomeDir,

    /// Neither `SPDL_DATA_DIR` nor a platform data directory is available.
    #[error("No place to keep settings; set SPDL_DATA_DIR to a writable directory")]
    NoDataDir,

    #[error("Download folder {0} is a file, not a directory")]
    NotADirectory(PathBuf),

    /// Returned instead of creating the folder when creation is disallowed.
    #[error("Download folder {0} does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("Could not create {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// A test file could not be written into the download folder.
    #[error("Cannot save tracks to {path}: {reason}")]
    NotWritable { path: PathBuf, reason: String },

    #[error("Download folder path is empty")]
    EmptyPath,

    /// Reading or rewriting the credentials `.env` file failed.
    #[error("Could not update credentials file {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },

    /// A relative folder was given but the working directory is gone.
    #[error("Cannot resolve relative download folder: {0}")]
    NoCurrentDir(String),
}
