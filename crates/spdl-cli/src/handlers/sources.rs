//! Sources command handler.
//!
//! Lists the audio sources in the order they are tried and, with `--check`,
//! whether each one is reachable right now.

use std::collections::HashMap;

use anyhow::Result;
use console::style;
use spdl_core::{Settings, SourceKind};
use spdl_sources::SourcesConfig;

use crate::bootstrap::{CliContext, build_downloader};

/// Role of a source in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
    Primary,
    Fallback,
    Disabled,
}

impl SourceRole {
    const fn label(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Fallback => "FALLBACK",
            Self::Disabled => "DISABLED",
        }
    }
}

/// Every known source with its role: enabled ones in priority order, then the rest.
pub fn source_rows(settings: &Settings) -> Vec<(SourceKind, SourceRole)> {
    let enabled = settings.enabled_sources();
    let mut rows: Vec<(SourceKind, SourceRole)> = enabled
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let role = if i == 0 {
                SourceRole::Primary
            } else {
                SourceRole::Fallback
            };
            (*kind, role)
        })
        .collect();

    rows.extend(
        SourceKind::ALL
            .into_iter()
            .filter(|kind| !enabled.contains(kind))
            .map(|kind| (kind, SourceRole::Disabled)),
    );
    rows
}

/// Execute the sources command.
pub async fn execute(ctx: &CliContext, check: bool) -> Result<()> {
    let rows = source_rows(&ctx.settings);

    let availability: HashMap<SourceKind, bool> = if check {
        println!("Checking sources...\n");
        build_downloader(&ctx.settings)?
            .check_sources()
            .await
            .into_iter()
            .collect()
    } else {
        HashMap::new()
    };

    println!("{}", style("Audio sources (tried in this order):").bold());
    for (i, (kind, role)) in rows.iter().enumerate() {
        let status = match availability.get(kind) {
            Some(true) => format!("{}", style("✓ available").green()),
            Some(false) => format!("{}", style("✗ unavailable").red()),
            None => String::new(),
        };
        println!(
            "  {}. {} {:<30} {:<9} {status}",
            i + 1,
            kind.icon(),
            kind.label(),
            role.label()
        );
    }

    let spotify = if SourcesConfig::from_env().has_spotify_credentials() {
        format!("{}", style("configured").green())
    } else {
        format!(
            "{} (set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET to download Spotify links)",
            style("not configured").yellow()
        )
    };
    println!("\nSpotify API: {spotify}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rows() {
        let rows = source_rows(&Settings::default());
        assert_eq!(
            rows,
            vec![
                (SourceKind::InternetArchive, SourceRole::Primary),
                (SourceKind::Jamendo, SourceRole::Fallback),
                (SourceKind::Youtube, SourceRole::Fallback),
            ]
        );
    }

    #[test]
    fn test_rows_follow_priority_and_list_disabled_last() {
        let settings = Settings {
            source_priority: vec![SourceKind::Youtube, SourceKind::Jamendo],
            jamendo_enabled: false,
            ..Default::default()
        };
        let rows = source_rows(&settings);
        assert_eq!(
            rows,
            vec![
                (SourceKind::Youtube, SourceRole::Primary),
                (SourceKind::InternetArchive, SourceRole::Disabled),
                (SourceKind::Jamendo, SourceRole::Disabled),
            ]
        );
    }
}
