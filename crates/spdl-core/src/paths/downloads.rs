//! Download directory resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::normalize_user_path;
use crate::settings::{DEFAULT_DOWNLOAD_FOLDER, Settings};

/// Environment variable overriding the download directory.
pub const DOWNLOAD_DIR_ENV: &str = "SPDL_DOWNLOAD_DIR";

/// How the download directory was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadDirSource {
    /// `--output` flag.
    Explicit,
    /// `SPDL_DOWNLOAD_DIR` (environment or `.env`).
    EnvVar,
    /// Saved user settings.
    Settings,
    /// Fallback default (`./downloads`).
    Default,
}

impl DownloadDirSource {
    /// Short description for `paths` output.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Explicit => "--output flag",
            Self::EnvVar => DOWNLOAD_DIR_ENV,
            Self::Settings => "user settings",
            Self::Default => "default",
        }
    }
}

/// Resolution result for the download directory.
#[derive(Debug, Clone)]
pub struct DownloadDirResolution {
    /// The resolved, absolute path.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: DownloadDirSource,
}

/// The default download directory (`./downloads` under the working directory).
pub fn default_download_dir() -> Result<PathBuf, PathError> {
    normalize_user_path(DEFAULT_DOWNLOAD_FOLDER)
}

/// Resolve the download directory.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `SPDL_DOWNLOAD_DIR` environment variable
/// 3. `download_folder` from the saved settings
/// 4. `./downloads`
pub fn resolve_download_dir(
    explicit: Option<&str>,
    settings: &Settings,
) -> Result<DownloadDirResolution, PathError> {
    if let Some(path_str) = explicit {
        return Ok(DownloadDirResolution {
            path: normalize_user_path(path_str)?,
            source: DownloadDirSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var(DOWNLOAD_DIR_ENV) {
        if !env_path.trim().is_empty() {
            return Ok(DownloadDirResolution {
                path: normalize_user_path(&env_path)?,
                source: DownloadDirSource::EnvVar,
            });
        }
    }

    if let Some(folder) = settings.download_folder.as_deref() {
        return Ok(DownloadDirResolution {
            path: normalize_user_path(folder)?,
            source: DownloadDirSource::Settings,
        });
    }

    Ok(DownloadDirResolution {
        path: default_download_dir()?,
        source: DownloadDirSource::Default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn test_resolve_prefers_explicit() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set(DOWNLOAD_DIR_ENV, "/tmp/env-value");
        let settings = Settings {
            download_folder: Some("/tmp/settings".to_string()),
            ..Default::default()
        };

        let resolved = resolve_download_dir(Some("/tmp/explicit"), &settings).unwrap();
        assert_eq!(resolved.source, DownloadDirSource::Explicit);
        assert!(resolved.path.ends_with("explicit"));
    }

    #[test]
    fn test_resolve_env_before_settings() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set(DOWNLOAD_DIR_ENV, "/tmp/from-env");
        let settings = Settings {
            download_folder: Some("/tmp/settings".to_string()),
            ..Default::default()
        };

        let resolved = resolve_download_dir(None, &settings).unwrap();
        assert_eq!(resolved.source, DownloadDirSource::EnvVar);
        assert!(resolved.path.ends_with("from-env"));
    }

    #[test]
    fn test_resolve_settings_then_default() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::unset(DOWNLOAD_DIR_ENV);

        let settings = Settings {
            download_folder: Some("/tmp/settings".to_string()),
            ..Default::default()
        };
        let resolved = resolve_download_dir(None, &settings).unwrap();
        assert_eq!(resolved.source, DownloadDirSource::Settings);
        assert_eq!(resolved.path, PathBuf::from("/tmp/settings"));

        let resolved = resolve_download_dir(None, &Settings::default()).unwrap();
        assert_eq!(resolved.source, DownloadDirSource::Default);
        assert!(resolved.path.ends_with("downloads"));
    }
}
