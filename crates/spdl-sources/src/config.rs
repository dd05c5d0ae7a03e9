//! Public configuration for the source adapters.
//!
//! Use the builder methods to customize HTTP behaviour, API keys and the
//! `yt-dlp` conversion options.

use std::path::PathBuf;
use std::time::Duration;

use spdl_core::{AudioFormat, AudioQuality, Settings};

/// Public Jamendo API client id (usable by anyone).
pub const DEFAULT_JAMENDO_CLIENT_ID: &str = "56d30c95";

/// Environment variable overriding the Jamendo client id.
pub const JAMENDO_CLIENT_ID_ENV: &str = "JAMENDO_CLIENT_ID";

/// Environment variable pointing at a specific `yt-dlp` binary.
pub const YTDLP_PATH_ENV: &str = "SPDL_YTDLP_PATH";

/// Environment variable holding the Spotify client id.
pub const SPOTIFY_CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";

/// Environment variable holding the Spotify client secret.
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Conversion options passed to `yt-dlp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YoutubeOptions {
    pub format: AudioFormat,
    pub quality: AudioQuality,
    pub embed_metadata: bool,
    pub embed_artwork: bool,
}

impl Default for YoutubeOptions {
    fn default() -> Self {
        Self {
            format: AudioFormat::Flac,
            quality: AudioQuality::BEST,
            embed_metadata: true,
            embed_artwork: true,
        }
    }
}

impl YoutubeOptions {
    /// Options derived from user settings.
    pub const fn from_settings(settings: &Settings) -> Self {
        Self {
            format: settings.preferred_format,
            quality: settings.preferred_quality,
            embed_metadata: settings.embed_metadata,
            embed_artwork: settings.effective_embed_artwork(),
        }
    }
}

/// Spotify client-credentials pair.
#[derive(Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl SpotifyCredentials {
    /// Read credentials from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var(SPOTIFY_CLIENT_ID_ENV).ok()?;
        let client_secret = std::env::var(SPOTIFY_CLIENT_SECRET_ENV).ok()?;
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return None;
        }
        Some(Self {
            client_id: client_id.trim().to_string(),
            client_secret: client_secret.trim().to_string(),
        })
    }
}

/// Configuration shared by all source adapters.
///
/// # Example
///
/// ```
/// use spdl_sources::SourcesConfig;
/// use std::time::Duration;
///
/// let config = SourcesConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_max_retries(5);
/// ```
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// API request timeout, also the longest silence tolerated mid-download
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
    /// Jamendo API client id
    pub(crate) jamendo_client_id: String,
    /// Explicit `yt-dlp` binary
    pub(crate) ytdlp_path: Option<PathBuf>,
    /// `yt-dlp` conversion options
    pub(crate) youtube: YoutubeOptions,
    /// Spotify API credentials
    pub(crate) spotify: Option<SpotifyCredentials>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!(
                "Mozilla/5.0 (compatible; SpotifyMusicDownloader/",
                env!("CARGO_PKG_VERSION"),
                ")"
            )
            .to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            jamendo_client_id: DEFAULT_JAMENDO_CLIENT_ID.to_string(),
            ytdlp_path: None,
            youtube: YoutubeOptions::default(),
            spotify: None,
        }
    }
}

impl SourcesConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus overrides from the environment
    /// (`JAMENDO_CLIENT_ID`, `SPDL_YTDLP_PATH`, Spotify credentials).
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(id) = std::env::var(JAMENDO_CLIENT_ID_ENV) {
            if !id.trim().is_empty() {
                config.jamendo_client_id = id.trim().to_string();
            }
        }
        if let Ok(path) = std::env::var(YTDLP_PATH_ENV) {
            if !path.trim().is_empty() {
                config.ytdlp_path = Some(PathBuf::from(path.trim()));
            }
        }
        config.spotify = SpotifyCredentials::from_env();
        config
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Bounds API calls and the wait for response headers. Downloads may take
    /// longer as long as data keeps arriving. Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Set the Jamendo client id.
    #[must_use]
    pub fn with_jamendo_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.jamendo_client_id = client_id.into();
        self
    }

    /// Use a specific `yt-dlp` binary instead of searching `PATH`.
    #[must_use]
    pub fn with_ytdlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ytdlp_path = Some(path.into());
        self
    }

    /// Set the `yt-dlp` conversion options.
    #[must_use]
    pub fn with_youtube_options(mut self, options: YoutubeOptions) -> Self {
        self.youtube = options;
        self
    }

    /// Set Spotify API credentials.
    #[must_use]
    pub fn with_spotify_credentials(mut self, credentials: Option<SpotifyCredentials>) -> Self {
        self.spotify = credentials;
        self
    }

    /// Whether Spotify credentials are configured.
    pub const fn has_spotify_credentials(&self) -> bool {
        self.spotify.is_some()
    }

    /// Configured `yt-dlp` conversion options.
    pub const fn youtube_options(&self) -> &YoutubeOptions {
        &self.youtube
    }
}
