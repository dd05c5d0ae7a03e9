//! Path utilities for the data directory and the download directory.
//!
//! - Data root (settings file, `.env`)
//! - Download directory resolution (flag, env, settings, default)
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately
//! - OS-specific logic is kept private in `platform`

mod config;
mod downloads;
mod ensure;
mod error;
mod platform;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::PathError;

pub use platform::{DATA_DIR_ENV, data_root, normalize_user_path};

pub use downloads::{
    DOWNLOAD_DIR_ENV, DownloadDirResolution, DownloadDirSource, default_download_dir,
    resolve_download_dir,
};

pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};

pub use config::{env_file_path, persist_env_value, settings_path};
