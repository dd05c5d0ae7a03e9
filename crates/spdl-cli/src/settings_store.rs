//! JSON file implementation of `SettingsRepository`.
//!
//! Settings live in `user_config.json` under the data root. Writes go to a
//! temporary file in the same directory which is then renamed into place.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use spdl_core::{PathError, RepositoryError, Settings, SettingsRepository, settings_path};
use tempfile::NamedTempFile;

/// Settings stored as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    /// Repository backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Repository at the default settings location.
    pub fn at_default_location() -> Result<Self, PathError> {
        Ok(Self::new(settings_path()?))
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), RepositoryError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| RepositoryError::Storage(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RepositoryError::Storage(e.to_string()))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| RepositoryError::Storage(e.error.to_string()))?;
    Ok(())
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(RepositoryError::Storage(e.to_string())),
        };

        serde_json::from_str(&contents).map_err(|e| {
            RepositoryError::Serialization(format!("{}: {e}", self.path.display()))
        })
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))??;

        tracing::debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    async fn reset(&self) -> Result<(), RepositoryError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Storage(e.to_string())),
        }
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdl_core::AudioFormat;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let temp = tempdir().unwrap();
        let repo = JsonSettingsRepository::new(temp.path().join("user_config.json"));

        assert!(!repo.exists().await);
        assert_eq!(repo.load().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_save_load_reset() {
        let temp = tempdir().unwrap();
        let repo = JsonSettingsRepository::new(temp.path().join("nested").join("user_config.json"));

        let settings = Settings {
            download_folder: Some("/music".to_string()),
            preferred_format: AudioFormat::Mp3,
            ..Default::default()
        };
        repo.save(&settings).await.unwrap();
        assert!(repo.exists().await);
        assert_eq!(repo.load().await.unwrap(), settings);

        repo.reset().await.unwrap();
        assert!(!repo.exists().await);
        repo.reset().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("user_config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let repo = JsonSettingsRepository::new(&path);
        assert!(matches!(
            repo.load().await,
            Err(RepositoryError::Serialization(_))
        ));
    }
}
