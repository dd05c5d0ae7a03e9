//! Configuration management subcommands.

use clap::Subcommand;

/// Configuration management commands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show all current settings
    Show,
    /// Set the download folder (created if missing)
    SetDownloadFolder {
        /// Directory where downloads should be stored
        path: String,
        /// Fail if the directory does not exist
        #[arg(long)]
        no_create: bool,
    },
    /// Set a single setting (see `config show` for the keys)
    Set {
        /// Setting name, e.g. `preferred_format`
        key: String,
        /// New value, e.g. `mp3`
        value: String,
    },
    /// Reset all settings to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Store Spotify API credentials in the data directory `.env`
    SetCredentials {
        /// Spotify client id
        client_id: String,
        /// Spotify client secret
        client_secret: String,
    },
    /// Run the interactive first-time setup again
    Setup,
}
