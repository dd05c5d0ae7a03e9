//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Download Spotify tracks, albums and playlists from free audio sources.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "spotify-downloader")]
#[command(about = "Download Spotify tracks from free audio sources")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (info logs, debug for this application)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Override the download directory for this invocation
    #[arg(short = 'o', long = "output", global = true)]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "spotify-downloader",
            "--verbose",
            "stats",
            "-o",
            "/tmp/music",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.output.as_deref(), Some("/tmp/music"));
        assert!(matches!(cli.command, Some(Commands::Stats)));
    }
}
