//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Settings repository (JSON file under the data root)
//! - Spotify resolver and audio sources (via spdl-sources)
//! - Batch runner (via spdl-download)
//!
//! Command handlers receive the composed `CliContext`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use spdl_core::{
    DownloadDirResolution, DownloadEventEmitterPort, OrganizationOptions, RepositoryError, Settings,
    SettingsRepository, SourceKind, TrackResolverPort, resolve_download_dir, validate_settings,
};
use spdl_download::{
    BatchConfig, BatchDeps, BatchRunner, FileValidator, MultiSourceDownloader, RetryDelay,
    build_batch_runner,
};
use spdl_sources::{SourcesConfig, SpotifyResolver, YoutubeOptions, build_audio_sources};

use crate::commands::DownloadOptions;
use crate::error::CliError;
use crate::settings_store::JsonSettingsRepository;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// `--output` override for the download directory.
    pub output: Option<String>,
}

/// Composed application context for CLI commands.
pub struct CliContext {
    /// Settings persistence.
    pub settings_repo: Arc<dyn SettingsRepository>,
    /// Settings as loaded at startup.
    pub settings: Settings,
    /// `--output` override, kept to re-resolve after setup changes the folder.
    pub output: Option<String>,
}

impl CliContext {
    /// Where downloads go for this invocation.
    pub fn download_dir(&self, settings: &Settings) -> Result<DownloadDirResolution, CliError> {
        Ok(resolve_download_dir(self.output.as_deref(), settings)?)
    }

    /// Saved settings with the command-line overrides applied.
    pub fn effective_settings(&self, options: &DownloadOptions) -> Result<Settings, CliError> {
        apply_overrides(&self.settings, options)
    }
}

/// Bootstrap the CLI application.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let repo = JsonSettingsRepository::at_default_location()
        .context("Failed to locate the settings file")?;
    tracing::debug!(path = %repo.path().display(), "Using settings file");
    let settings_repo: Arc<dyn SettingsRepository> = Arc::new(repo);
    Ok(bootstrap_with(settings_repo, config).await?)
}

/// Bootstrap with a custom settings repository (for testing).
pub async fn bootstrap_with(
    settings_repo: Arc<dyn SettingsRepository>,
    config: CliConfig,
) -> Result<CliContext, CliError> {
    let settings = match settings_repo.load().await {
        Ok(settings) => settings,
        Err(RepositoryError::Serialization(reason)) => {
            tracing::warn!(%reason, "Settings file is unreadable, using defaults");
            Settings::default()
        }
        Err(e) => return Err(e.into()),
    };
    Ok(CliContext {
        settings_repo,
        settings,
        output: config.output,
    })
}

/// Apply per-invocation overrides and validate the result.
pub fn apply_overrides(settings: &Settings, options: &DownloadOptions) -> Result<Settings, CliError> {
    let mut next = settings.clone();
    if let Some(format) = options.format {
        next.preferred_format = format;
    }
    if let Some(quality) = options.quality {
        next.preferred_quality = quality;
    }
    if let Some(concurrent) = options.concurrent {
        next.max_concurrent = concurrent;
    }
    if let Some(ref sources) = options.sources {
        next.source_priority.clone_from(&sources.0);
        for kind in &sources.0 {
            match kind {
                SourceKind::InternetArchive => next.internetarchive_enabled = true,
                SourceKind::Jamendo => next.jamendo_enabled = true,
                SourceKind::Youtube => next.youtube_enabled = true,
            }
        }
    }
    if options.no_skip_existing {
        next.skip_existing = false;
    }

    validate_settings(&next)?;
    Ok(next)
}

/// Source adapter configuration: environment plus conversion settings.
pub fn sources_config(settings: &Settings) -> SourcesConfig {
    SourcesConfig::from_env().with_youtube_options(YoutubeOptions::from_settings(settings))
}

/// Build the Spotify resolver.
pub fn build_resolver(config: &SourcesConfig) -> Result<Arc<dyn TrackResolverPort>, CliError> {
    Ok(Arc::new(SpotifyResolver::new(config)?))
}

/// Build a source manager for the enabled sources (used by `sources --check`).
pub fn build_downloader(settings: &Settings) -> Result<MultiSourceDownloader, CliError> {
    let kinds = settings.enabled_sources();
    let sources = build_audio_sources(&sources_config(settings), &kinds)?;
    Ok(MultiSourceDownloader::new(sources, &kinds))
}

/// Build the batch runner for `settings`, writing into `output_dir`.
pub fn build_runner(
    settings: &Settings,
    output_dir: &Path,
    emitter: Arc<dyn DownloadEventEmitterPort>,
) -> Result<BatchRunner, CliError> {
    let kinds = settings.enabled_sources();
    if kinds.is_empty() {
        return Err(CliError::Config(
            "No audio sources are enabled (see `config set <source>_enabled true`)".to_string(),
        ));
    }

    let sources = build_audio_sources(&sources_config(settings), &kinds)?;
    let deps = BatchDeps {
        sources,
        priority: kinds,
        emitter,
        validator: FileValidator::new(),
        retry_delay: RetryDelay::default(),
    };

    let mut config = BatchConfig::new(organization(settings, output_dir.to_path_buf()));
    config.max_concurrent = usize::try_from(settings.max_concurrent).unwrap_or(1);
    config.skip_existing = settings.skip_existing;

    Ok(build_batch_runner(deps, config))
}

fn organization(settings: &Settings, output_dir: PathBuf) -> OrganizationOptions {
    OrganizationOptions {
        output_dir,
        organize_by_artist: settings.organize_by_artist,
        filename_format: settings.filename_format.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SourceList;
    use spdl_core::ports::MockSettingsRepository;
    use spdl_core::AudioFormat;

    #[tokio::test]
    async fn test_bootstrap_with_loads_settings() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_load().returning(|| {
            Ok(Settings {
                download_folder: Some("/music".to_string()),
                ..Default::default()
            })
        });

        let ctx = bootstrap_with(
            Arc::new(repo),
            CliConfig {
                output: Some("/tmp/out".to_string()),
            },
        )
        .await
        .unwrap();

        assert!(ctx.settings.is_configured());
        let resolved = ctx.download_dir(&ctx.settings).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/tmp/out"));
    }

    #[tokio::test]
    async fn test_bootstrap_with_unreadable_settings_uses_defaults() {
        let mut repo = MockSettingsRepository::new();
        repo.expect_load()
            .returning(|| Err(RepositoryError::Serialization("bad json".to_string())));

        let ctx = bootstrap_with(Arc::new(repo), CliConfig::default())
            .await
            .unwrap();
        assert_eq!(ctx.settings, Settings::default());
    }

    #[test]
    fn test_apply_overrides() {
        let settings = Settings {
            jamendo_enabled: false,
            ..Default::default()
        };
        let options = DownloadOptions {
            format: Some(AudioFormat::Mp3),
            concurrent: Some(5),
            sources: Some(SourceList(vec![SourceKind::Jamendo, SourceKind::Youtube])),
            no_skip_existing: true,
            ..Default::default()
        };

        let next = apply_overrides(&settings, &options).unwrap();
        assert_eq!(next.preferred_format, AudioFormat::Mp3);
        assert_eq!(next.max_concurrent, 5);
        assert!(!next.skip_existing);
        assert_eq!(
            next.enabled_sources(),
            vec![SourceKind::Jamendo, SourceKind::Youtube]
        );
        assert_eq!(settings.max_concurrent, 2);
    }

    #[test]
    fn test_apply_overrides_without_options_keeps_settings() {
        let settings = Settings::default();
        let next = apply_overrides(&settings, &DownloadOptions::default()).unwrap();
        assert_eq!(next, settings);
    }

    #[test]
    fn test_build_runner_requires_a_source() {
        let settings = Settings {
            internetarchive_enabled: false,
            jamendo_enabled: false,
            youtube_enabled: false,
            ..Default::default()
        };
        let result = build_runner(
            &settings,
            Path::new("/tmp/out"),
            Arc::new(spdl_core::NoopDownloadEmitter::new()),
        );
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
