//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics and debugging.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use spdl_core::{DownloadDirResolution, data_root, env_file_path, settings_path};
use spdl_download::{FailedTracksFile, TRACKER_FILE_NAME};

use crate::bootstrap::CliContext;

/// Every path the application reads or writes.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub data_dir: PathBuf,
    pub settings_file: PathBuf,
    pub env_file: PathBuf,
    pub download_dir: DownloadDirResolution,
    pub tracker_file: PathBuf,
    pub failed_file: PathBuf,
}

impl ResolvedPaths {
    /// Resolve all paths for this invocation.
    pub fn resolve(ctx: &CliContext) -> Result<Self> {
        let download_dir = ctx.download_dir(&ctx.settings)?;
        Ok(Self {
            data_dir: data_root()?,
            settings_file: settings_path()?,
            env_file: env_file_path()?,
            tracker_file: download_dir.path.join(TRACKER_FILE_NAME),
            failed_file: FailedTracksFile::path_in(&download_dir.path),
            download_dir,
        })
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data_dir      = {}", self.data_dir.display())?;
        writeln!(f, "settings_file = {}", self.settings_file.display())?;
        writeln!(f, "env_file      = {}", self.env_file.display())?;
        writeln!(
            f,
            "download_dir  = {} (source: {})",
            self.download_dir.path.display(),
            self.download_dir.source.describe()
        )?;
        writeln!(f, "tracker_file  = {}", self.tracker_file.display())?;
        write!(f, "failed_file   = {}", self.failed_file.display())
    }
}

/// Execute the paths command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let paths = ResolvedPaths::resolve(ctx)?;
    println!("{paths}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdl_core::DownloadDirSource;

    #[test]
    fn test_display() {
        let paths = ResolvedPaths {
            data_dir: PathBuf::from("/data"),
            settings_file: PathBuf::from("/data/user_config.json"),
            env_file: PathBuf::from("/data/.env"),
            download_dir: DownloadDirResolution {
                path: PathBuf::from("/music"),
                source: DownloadDirSource::Explicit,
            },
            tracker_file: PathBuf::from("/music/.download_tracker.json"),
            failed_file: PathBuf::from("/music/failed_tracks.json"),
        };

        let text = paths.to_string();
        assert!(text.contains("settings_file = /data/user_config.json"));
        assert!(text.contains("download_dir  = /music (source: --output flag)"));
        assert!(text.ends_with("failed_file   = /music/failed_tracks.json"));
    }
}
