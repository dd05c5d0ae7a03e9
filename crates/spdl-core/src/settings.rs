//! Settings domain types and validation.
//!
//! User preferences persisted between runs. The JSON field names match the
//! `user_config.json` file written by the setup wizard.

use serde::{Deserialize, Serialize};

use crate::download::{AudioFormat, AudioQuality, DEFAULT_SOURCE_PRIORITY, SourceKind};
use crate::utils::validate_template;

/// Download folder used until the user picks one.
pub const DEFAULT_DOWNLOAD_FOLDER: &str = "./downloads";

/// Default filename template (without extension).
pub const DEFAULT_FILENAME_FORMAT: &str = "{track_number:02} - {artist} - {title}";

/// Default number of simultaneous downloads.
pub const DEFAULT_MAX_CONCURRENT: u32 = 2;

/// Upper bound for simultaneous downloads.
pub const MAX_CONCURRENT_LIMIT: u32 = 10;

/// Keys accepted by [`Settings::set_key`].
pub const SETTING_KEYS: [&str; 13] = [
    "download_folder",
    "preferred_format",
    "preferred_quality",
    "max_concurrent",
    "embed_metadata",
    "embed_artwork",
    "skip_existing",
    "organize_by_artist",
    "filename_format",
    "source_priority",
    "internetarchive_enabled",
    "jamendo_enabled",
    "youtube_enabled",
];

/// User settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Where downloads are written. `None` until first-time setup ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_folder: Option<String>,

    /// Output format for sources that convert (YouTube).
    pub preferred_format: AudioFormat,

    /// Bitrate for lossy output.
    pub preferred_quality: AudioQuality,

    /// Simultaneous downloads (1-10).
    pub max_concurrent: u32,

    /// Embed tags into converted files.
    pub embed_metadata: bool,

    /// Embed cover art into converted files.
    pub embed_artwork: bool,

    /// Skip tracks that are already on disk.
    pub skip_existing: bool,

    /// Put files under `<artist>/<album>/`.
    pub organize_by_artist: bool,

    /// Filename template without extension.
    pub filename_format: String,

    /// Order in which sources are tried.
    pub source_priority: Vec<SourceKind>,

    pub internetarchive_enabled: bool,
    pub jamendo_enabled: bool,
    pub youtube_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_folder: None,
            preferred_format: AudioFormat::Flac,
            preferred_quality: AudioQuality::BEST,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            embed_metadata: true,
            embed_artwork: true,
            skip_existing: true,
            organize_by_artist: true,
            filename_format: DEFAULT_FILENAME_FORMAT.to_string(),
            source_priority: DEFAULT_SOURCE_PRIORITY.to_vec(),
            internetarchive_enabled: true,
            jamendo_enabled: true,
            youtube_enabled: true,
        }
    }
}

impl Settings {
    /// Whether first-time setup has chosen a download folder.
    pub const fn is_configured(&self) -> bool {
        self.download_folder.is_some()
    }

    /// Download folder with default fallback.
    pub fn effective_download_folder(&self) -> &str {
        self.download_folder
            .as_deref()
            .unwrap_or(DEFAULT_DOWNLOAD_FOLDER)
    }

    /// Artwork is only embedded when metadata is.
    pub const fn effective_embed_artwork(&self) -> bool {
        self.embed_metadata && self.embed_artwork
    }

    /// Whether `kind` is switched on.
    pub const fn is_source_enabled(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::InternetArchive => self.internetarchive_enabled,
            SourceKind::Jamendo => self.jamendo_enabled,
            SourceKind::Youtube => self.youtube_enabled,
        }
    }

    /// Enabled sources in priority order.
    pub fn enabled_sources(&self) -> Vec<SourceKind> {
        self.source_priority
            .iter()
            .copied()
            .filter(|kind| self.is_source_enabled(*kind))
            .collect()
    }

    /// Merge an update into these settings, only touching fields that are `Some`.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref folder) = other.download_folder {
            self.download_folder.clone_from(folder);
        }
        if let Some(format) = other.preferred_format {
            self.preferred_format = format;
        }
        if let Some(quality) = other.preferred_quality {
            self.preferred_quality = quality;
        }
        if let Some(concurrent) = other.max_concurrent {
            self.max_concurrent = concurrent;
        }
        if let Some(embed) = other.embed_metadata {
            self.embed_metadata = embed;
        }
        if let Some(artwork) = other.embed_artwork {
            self.embed_artwork = artwork;
        }
        if let Some(skip) = other.skip_existing {
            self.skip_existing = skip;
        }
        if let Some(organize) = other.organize_by_artist {
            self.organize_by_artist = organize;
        }
        if let Some(ref format) = other.filename_format {
            self.filename_format.clone_from(format);
        }
        if let Some(ref priority) = other.source_priority {
            self.source_priority.clone_from(priority);
        }
        if !self.embed_metadata {
            self.embed_artwork = false;
        }
    }

    /// Set a single setting from its string form (`config set <key> <value>`).
    ///
    /// The result is validated; on error the settings are left unchanged.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidValue {
            key: key.to_string(),
            reason,
        };

        let mut next = self.clone();
        match key {
            "download_folder" => next.download_folder = Some(value.trim().to_string()),
            "preferred_format" => next.preferred_format = value.parse().map_err(invalid)?,
            "preferred_quality" => next.preferred_quality = value.parse().map_err(invalid)?,
            "max_concurrent" => {
                next.max_concurrent = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("'{value}' is not a number")))?;
            }
            "embed_metadata" => next.embed_metadata = parse_bool(value).map_err(invalid)?,
            "embed_artwork" => next.embed_artwork = parse_bool(value).map_err(invalid)?,
            "skip_existing" => next.skip_existing = parse_bool(value).map_err(invalid)?,
            "organize_by_artist" => next.organize_by_artist = parse_bool(value).map_err(invalid)?,
            "filename_format" => next.filename_format = value.to_string(),
            "source_priority" => {
                next.source_priority = SourceKind::parse_list(value).map_err(invalid)?;
            }
            "internetarchive_enabled" => {
                next.internetarchive_enabled = parse_bool(value).map_err(invalid)?;
            }
            "jamendo_enabled" => next.jamendo_enabled = parse_bool(value).map_err(invalid)?,
            "youtube_enabled" => next.youtube_enabled = parse_bool(value).map_err(invalid)?,
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }

        if !next.embed_metadata {
            next.embed_artwork = false;
        }
        validate_settings(&next)?;
        *self = next;
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        other => Err(format!("'{other}' is not a boolean (use true/false)")),
    }
}

/// Partial settings update.
///
/// `download_folder` is `Option<Option<String>>`:
/// - `None` = don't change this field
/// - `Some(None)` = clear it (setup runs again)
/// - `Some(Some(value))` = set it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub download_folder: Option<Option<String>>,
    pub preferred_format: Option<AudioFormat>,
    pub preferred_quality: Option<AudioQuality>,
    pub max_concurrent: Option<u32>,
    pub embed_metadata: Option<bool>,
    pub embed_artwork: Option<bool>,
    pub skip_existing: Option<bool>,
    pub organize_by_artist: Option<bool>,
    pub filename_format: Option<String>,
    pub source_priority: Option<Vec<SourceKind>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Download folder cannot be empty")]
    EmptyDownloadPath,

    #[error("Concurrent downloads must be between 1 and {MAX_CONCURRENT_LIMIT}, got {0}")]
    InvalidConcurrency(u32),

    #[error("Invalid filename format: {0}")]
    InvalidFilenameFormat(String),

    #[error("Source priority cannot be empty")]
    EmptySourcePriority,

    #[error("Source '{0}' appears more than once in the priority list")]
    DuplicateSource(SourceKind),

    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings
        .download_folder
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyDownloadPath);
    }

    if !(1..=MAX_CONCURRENT_LIMIT).contains(&settings.max_concurrent) {
        return Err(SettingsError::InvalidConcurrency(settings.max_concurrent));
    }

    validate_template(&settings.filename_format)
        .map_err(|e| SettingsError::InvalidFilenameFormat(e.to_string()))?;

    if settings.source_priority.is_empty() {
        return Err(SettingsError::EmptySourcePriority);
    }
    for (i, kind) in settings.source_priority.iter().enumerate() {
        if settings.source_priority[..i].contains(kind) {
            return Err(SettingsError::DuplicateSource(*kind));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.is_configured());
        assert_eq!(settings.effective_download_folder(), DEFAULT_DOWNLOAD_FOLDER);
        assert_eq!(settings.preferred_format, AudioFormat::Flac);
        assert_eq!(settings.preferred_quality.kbps(), 320);
        assert_eq!(settings.max_concurrent, 2);
        assert_eq!(settings.source_priority, DEFAULT_SOURCE_PRIORITY.to_vec());
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_deserialize_partial_file() {
        let json = r#"{"download_folder": "/music", "preferred_format": "mp3",
            "preferred_quality": "192", "max_concurrent": 4}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(settings.is_configured());
        assert_eq!(settings.preferred_format, AudioFormat::Mp3);
        assert_eq!(settings.preferred_quality.kbps(), 192);
        assert_eq!(settings.max_concurrent, 4);
        assert!(settings.embed_metadata);
        assert_eq!(settings.filename_format, DEFAULT_FILENAME_FORMAT);
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        for bad in [0, 11] {
            let settings = Settings {
                max_concurrent: bad,
                ..Default::default()
            };
            assert!(matches!(
                validate_settings(&settings),
                Err(SettingsError::InvalidConcurrency(n)) if n == bad
            ));
        }
    }

    #[test]
    fn test_validate_empty_path() {
        let settings = Settings {
            download_folder: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyDownloadPath)
        ));
    }

    #[test]
    fn test_validate_filename_format() {
        let settings = Settings {
            filename_format: "{year}".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidFilenameFormat(_))
        ));
    }

    #[test]
    fn test_validate_source_priority() {
        let empty = Settings {
            source_priority: vec![],
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&empty),
            Err(SettingsError::EmptySourcePriority)
        ));

        let dup = Settings {
            source_priority: vec![SourceKind::Youtube, SourceKind::Youtube],
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&dup),
            Err(SettingsError::DuplicateSource(SourceKind::Youtube))
        ));
    }

    #[test]
    fn test_enabled_sources_follow_priority() {
        let settings = Settings {
            source_priority: vec![SourceKind::Youtube, SourceKind::Jamendo],
            jamendo_enabled: false,
            ..Default::default()
        };
        assert_eq!(settings.enabled_sources(), vec![SourceKind::Youtube]);
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = Settings::default();
        let update = SettingsUpdate {
            download_folder: Some(Some("/music".to_string())),
            max_concurrent: Some(4),
            embed_metadata: Some(false),
            ..Default::default()
        };
        settings.merge(&update);

        assert_eq!(settings.download_folder.as_deref(), Some("/music"));
        assert_eq!(settings.max_concurrent, 4);
        assert!(!settings.embed_artwork);
        assert!(settings.skip_existing);

        settings.merge(&SettingsUpdate {
            download_folder: Some(None),
            ..Default::default()
        });
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_set_key() {
        let mut settings = Settings::default();
        settings.set_key("preferred_format", "MP3").unwrap();
        settings.set_key("preferred_quality", "256").unwrap();
        settings.set_key("skip_existing", "no").unwrap();
        settings.set_key("source_priority", "youtube,jamendo").unwrap();

        assert_eq!(settings.preferred_format, AudioFormat::Mp3);
        assert_eq!(settings.preferred_quality.kbps(), 256);
        assert!(!settings.skip_existing);
        assert_eq!(
            settings.source_priority,
            vec![SourceKind::Youtube, SourceKind::Jamendo]
        );
    }

    #[test]
    fn test_set_key_rejects_and_leaves_settings_untouched() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_key("volume", "11"),
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(matches!(
            settings.set_key("max_concurrent", "50"),
            Err(SettingsError::InvalidConcurrency(50))
        ));
        assert!(matches!(
            settings.set_key("embed_metadata", "maybe"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_set_key_metadata_off_disables_artwork() {
        let mut settings = Settings::default();
        settings.set_key("embed_metadata", "false").unwrap();
        assert!(!settings.embed_artwork);
        assert!(!settings.effective_embed_artwork());
    }
}
