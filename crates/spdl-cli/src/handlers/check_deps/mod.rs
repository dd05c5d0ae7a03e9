//! Check system dependencies handler.
//!
//! Looks for the external programs downloads rely on and prints a status
//! table plus install hints for anything missing.

mod display;
mod instructions;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use console::style;
use spdl_download::FFPROBE_PROGRAM;
use spdl_sources::{YTDLP_PATH_ENV, YTDLP_PROGRAM, locate_ytdlp};
use tokio::process::Command;

use display::print_dependency;
use instructions::print_installation_instructions;

/// Program used for conversion and artwork embedding.
pub const FFMPEG_PROGRAM: &str = "ffmpeg";

/// Whether a dependency was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Installed; the version is empty when it could not be read.
    Present { version: String },
    Missing,
}

/// An external program the downloader uses.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub status: DependencyStatus,
}

impl Dependency {
    const fn new(name: &'static str, description: &'static str, required: bool) -> Self {
        Self {
            name,
            description,
            required,
            status: DependencyStatus::Missing,
        }
    }

    fn with_status(mut self, status: DependencyStatus) -> Self {
        self.status = status;
        self
    }

    const fn is_missing(&self) -> bool {
        matches!(self.status, DependencyStatus::Missing)
    }
}

/// Execute the check-deps command.
///
/// Returns an error when a required dependency is missing.
pub async fn execute() -> Result<()> {
    println!("{}\n", style("Checking system dependencies...").bold().blue());

    let dependencies = check_all().await;

    println!(
        "{}",
        style(format!("{:<20} {:<25} {}", "DEPENDENCY", "STATUS", "NOTES")).bold()
    );
    println!("{}", "=".repeat(80));
    for dep in &dependencies {
        print_dependency(dep);
    }
    println!("{}", "=".repeat(80));

    let missing: Vec<&Dependency> = dependencies.iter().filter(|d| d.is_missing()).collect();
    let missing_required = missing.iter().filter(|d| d.required).count();
    let total_required = dependencies.iter().filter(|d| d.required).count();

    if !missing.is_empty() {
        print_installation_instructions(&missing);
    }

    if missing_required == 0 {
        println!(
            "\n{} ({}/{})",
            style("✓ All required dependencies are installed!").green(),
            total_required,
            total_required
        );
        Ok(())
    } else {
        println!(
            "\n{} ({}/{})",
            style(format!(
                "✗ {missing_required} required dependencies are missing."
            ))
            .red(),
            total_required - missing_required,
            total_required
        );
        bail!("Missing required dependencies")
    }
}

async fn check_all() -> Vec<Dependency> {
    let ytdlp_override = std::env::var_os(YTDLP_PATH_ENV).map(PathBuf::from);
    let ytdlp = locate_ytdlp(ytdlp_override.as_deref());

    vec![
        Dependency::new(YTDLP_PROGRAM, "YouTube search and download", true)
            .with_status(query_version(ytdlp.as_deref(), "--version").await),
        Dependency::new(FFMPEG_PROGRAM, "Audio conversion and artwork", true)
            .with_status(query_version(which::which(FFMPEG_PROGRAM).ok().as_deref(), "-version").await),
        Dependency::new(FFPROBE_PROGRAM, "Duration check of downloads", false)
            .with_status(query_version(which::which(FFPROBE_PROGRAM).ok().as_deref(), "-version").await),
    ]
}

async fn query_version(binary: Option<&Path>, version_arg: &str) -> DependencyStatus {
    let Some(binary) = binary else {
        return DependencyStatus::Missing;
    };

    match Command::new(binary).arg(version_arg).output().await {
        Ok(output) => DependencyStatus::Present {
            version: parse_version(&String::from_utf8_lossy(&output.stdout)),
        },
        Err(e) => {
            tracing::debug!(binary = %binary.display(), error = %e, "Failed to run dependency");
            DependencyStatus::Missing
        }
    }
}

/// Version from `--version` output: the token after `version`, else the first line.
pub fn parse_version(output: &str) -> String {
    let first = output.lines().next().unwrap_or_default().trim();
    let mut tokens = first.split_whitespace();
    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case("version") {
            return tokens.next().unwrap_or_default().to_string();
        }
    }
    first.to_string()
}
