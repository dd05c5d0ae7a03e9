//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use std::str::FromStr;

use clap::{Args, Subcommand};
use spdl_core::{AudioFormat, AudioQuality, SourceKind};

use crate::config_commands::ConfigCommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Download tracks from Spotify links, track list files or "Artist - Title" queries
    Download(DownloadArgs),

    /// Retry the tracks that failed in the last run
    Retry {
        #[command(flatten)]
        options: DownloadOptions,
    },

    /// List the configured audio sources in priority order
    Sources {
        /// Check each source and report whether it is reachable
        #[arg(long)]
        check: bool,
    },

    /// Show statistics for the download directory
    Stats,

    /// View or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Check that yt-dlp, ffmpeg and ffprobe are installed
    CheckDeps,

    /// Show resolved paths for settings and downloads
    Paths,
}

/// Arguments of the `download` command.
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Spotify URL/URI, path to a JSON track list, or "Artist - Title"
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Resolve the inputs and list the tracks without downloading
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub options: DownloadOptions,
}

/// Per-invocation overrides of the saved settings.
#[derive(Args, Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Output format for converted downloads (flac, mp3, m4a, wav, opus, vorbis)
    #[arg(short, long)]
    pub format: Option<AudioFormat>,

    /// Bitrate for lossy formats (128, 192, 256, 320)
    #[arg(short, long)]
    pub quality: Option<AudioQuality>,

    /// Number of simultaneous downloads (1-10)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub concurrent: Option<u32>,

    /// Sources to use, in order (e.g. "jamendo,youtube")
    #[arg(short, long)]
    pub sources: Option<SourceList>,

    /// Download tracks again even if they are already on disk
    #[arg(long)]
    pub no_skip_existing: bool,
}

/// A comma-separated source priority list given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceList(pub Vec<SourceKind>);

impl FromStr for SourceList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::parse_list(s).map(Self)
    }
}
