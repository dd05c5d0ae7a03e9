//! Command-line interface for spotify-downloader.
//!
//! Turns Spotify links, track-list files and search queries into local audio
//! files using free sources (Internet Archive, Jamendo, YouTube via yt-dlp).
//!
//! - `parser` / `commands` / `config_commands` - clap definitions
//! - `bootstrap` - composition root building the `CliContext`
//! - `handlers` - one module per command
//! - `presentation` - progress bars and the end-of-run summary
//! - `setup` - interactive first-time setup

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod settings_store;
pub mod setup;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use config_commands::ConfigCommand;
pub use error::{CliError, EXIT_TRACKS_FAILED, exit_code_for};
pub use parser::Cli;

use spdl_core::BatchSummary;

/// Process exit code for a finished download run.
///
/// Non-zero when any track failed or the run was cancelled.
pub fn batch_exit_code(summary: Option<&BatchSummary>) -> i32 {
    match summary {
        Some(summary) if summary.has_failures() || summary.cancelled => EXIT_TRACKS_FAILED,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_batch_exit_code() {
        assert_eq!(batch_exit_code(None), 0);

        let mut summary = BatchSummary::new(Uuid::new_v4());
        summary.completed = 3;
        assert_eq!(batch_exit_code(Some(&summary)), 0);

        summary.failed = 1;
        assert_eq!(batch_exit_code(Some(&summary)), EXIT_TRACKS_FAILED);

        summary.failed = 0;
        summary.cancelled = true;
        assert_eq!(batch_exit_code(Some(&summary)), EXIT_TRACKS_FAILED);
    }
}
