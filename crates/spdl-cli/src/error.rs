//! CLI-specific error types and mappings.
//!
//! This module provides the error type for the CLI adapter and the mapping
//! from domain errors to exit codes.

use spdl_core::{
    CoreError, DownloadError, PathError, RepositoryError, ResolveError, SettingsError,
    TrackListError,
};
use thiserror::Error;

/// Exit code for a run where at least one track failed.
pub const EXIT_TRACKS_FAILED: i32 = 1;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generic failure.
    #[error("{0}")]
    General(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error, or some tracks failed
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 74: I/O error (`EX_IOERR`)
    /// - 78: Configuration error (`EX_CONFIG`)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::General(_) => 1,
            Self::Arguments(_) => 2,
            Self::Io(_) => 74,
            Self::Config(_) => 78,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::NoHomeDir | PathError::NoDataDir | PathError::EmptyPath => {
                Self::Config(err.to_string())
            }
            other => Self::Io(other.to_string()),
        }
    }
}

impl From<DownloadError> for CliError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Io { .. } => Self::Io(err.to_string()),
            DownloadError::ToolMissing { .. } => Self::Config(err.to_string()),
            other => Self::General(other.to_string()),
        }
    }
}

impl From<ResolveError> for CliError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::MissingCredentials(_) | ResolveError::Auth(_) => {
                Self::Config(err.to_string())
            }
            ResolveError::Unsupported(_) => Self::Arguments(err.to_string()),
            other => Self::General(other.to_string()),
        }
    }
}

impl From<TrackListError> for CliError {
    fn from(err: TrackListError) -> Self {
        match err {
            TrackListError::Read { .. } => Self::Io(err.to_string()),
            other => Self::Arguments(other.to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(e) => e.into(),
            CoreError::Settings(e) => e.into(),
            CoreError::Path(e) => e.into(),
            CoreError::Download(e) => e.into(),
            CoreError::Resolve(e) => e.into(),
            CoreError::TrackList(e) => e.into(),
            CoreError::Validation(msg) => Self::Arguments(msg),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for an error that reached `main`.
///
/// Walks the cause chain and uses the first error with a known category.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<SettingsError>() {
            return CliError::from(e.clone()).exit_code();
        }
        if cause.is::<RepositoryError>() {
            return 78;
        }
        if let Some(e) = cause.downcast_ref::<DownloadError>() {
            return CliError::from(e.clone()).exit_code();
        }
        if let Some(e) = cause.downcast_ref::<PathError>() {
            return match e {
                PathError::NoHomeDir | PathError::NoDataDir | PathError::EmptyPath => 78,
                _ => 74,
            };
        }
        if let Some(e) = cause.downcast_ref::<ResolveError>() {
            return match e {
                ResolveError::MissingCredentials(_) | ResolveError::Auth(_) => 78,
                ResolveError::Unsupported(_) => 2,
                _ => 1,
            };
        }
        if let Some(e) = cause.downcast_ref::<TrackListError>() {
            return match e {
                TrackListError::Read { .. } => 74,
                _ => 2,
            };
        }
        if cause.is::<std::io::Error>() {
            return 74;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::General("x".into()).exit_code(), 1);
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
    }

    #[test]
    fn test_from_domain_errors() {
        let err: CliError = SettingsError::InvalidConcurrency(0).into();
        assert_eq!(err.exit_code(), 78);

        let err: CliError = DownloadError::io("write", "disk full").into();
        assert_eq!(err.exit_code(), 74);

        let err: CliError = ResolveError::MissingCredentials("SPOTIFY_CLIENT_ID".into()).into();
        assert_eq!(err.exit_code(), 78);

        let err: CliError = TrackListError::InvalidQuery("nope".into()).into();
        assert_eq!(err.exit_code(), 2);

        let err: CliError = CoreError::Validation("bad".into()).into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_for_walks_context_chain() {
        let result: Result<(), SettingsError> = Err(SettingsError::EmptySourcePriority);
        let err = result.context("Failed to save settings").unwrap_err();
        assert_eq!(exit_code_for(&err), 78);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = anyhow::Error::new(io).context("Failed to write");
        assert_eq!(exit_code_for(&err), 74);

        let err = anyhow::Error::new(CliError::Arguments("x".into()));
        assert_eq!(exit_code_for(&err), 2);

        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 1);
    }
}
