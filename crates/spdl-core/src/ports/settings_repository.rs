//! Settings repository trait definition.
//!
//! This port defines the interface for user settings persistence.
//! Implementations handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::settings::Settings;

/// Repository for user settings persistence.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load settings.
    ///
    /// Returns default settings if none are stored.
    async fn load(&self) -> Result<Settings, RepositoryError>;

    /// Save settings.
    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError>;

    /// Delete stored settings so the next load returns defaults.
    async fn reset(&self) -> Result<(), RepositoryError>;

    /// Whether settings have been saved before.
    async fn exists(&self) -> bool;
}
