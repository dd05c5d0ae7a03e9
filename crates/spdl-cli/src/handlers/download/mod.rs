//! Download command handler.
//!
//! Resolves the inputs into tracks, runs the first-time setup when needed
//! and drives a batch with terminal progress.

mod inputs;

pub use inputs::{InputKind, classify_input, collect_tracks};

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::{Term, style};
use spdl_core::{BatchSummary, DirectoryCreationStrategy, Settings, Track, ensure_directory};
use spdl_download::FailedTracksFile;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bootstrap::{CliContext, apply_overrides, build_resolver, build_runner, sources_config};
use crate::commands::DownloadArgs;
use crate::presentation::{ProgressEmitter, print_summary};
use crate::setup;

/// Execute the download command.
///
/// Returns the batch summary, or `None` when nothing was downloaded
/// (dry run or no tracks).
pub async fn execute(ctx: &CliContext, args: DownloadArgs) -> Result<Option<BatchSummary>> {
    let base = first_run_settings(ctx).await?;
    let settings = apply_overrides(&base, &args.options)?;

    let resolver = build_resolver(&sources_config(&settings))?;
    let tracks = collect_tracks(&args.inputs, resolver.as_ref()).await?;
    if tracks.is_empty() {
        println!("No tracks to download.");
        return Ok(None);
    }

    if args.dry_run {
        print_track_list(&tracks.tracks);
        return Ok(None);
    }

    let dir = ctx.download_dir(&settings)?;
    run_batch(&settings, &dir.path, tracks.tracks).await.map(Some)
}

/// Settings to download with, running setup first on an unconfigured interactive terminal.
async fn first_run_settings(ctx: &CliContext) -> Result<Settings> {
    let interactive = Term::stdout().is_term() && std::io::stdin().is_terminal();
    if ctx.settings.is_configured() || !interactive || ctx.settings_repo.exists().await {
        return Ok(ctx.settings.clone());
    }

    println!("Welcome! Let's set up where and how music is downloaded.\n");
    setup::run_and_save(ctx.settings_repo.as_ref(), &ctx.settings).await
}

/// Download `tracks` into `output_dir` and print the summary.
pub async fn run_batch(
    settings: &Settings,
    output_dir: &Path,
    tracks: Vec<Track>,
) -> Result<BatchSummary> {
    ensure_directory(output_dir, DirectoryCreationStrategy::AutoCreate)
        .with_context(|| format!("Cannot write to {}", output_dir.display()))?;

    let sources: Vec<&str> = settings
        .enabled_sources()
        .iter()
        .map(|s| s.as_str())
        .collect();
    println!(
        "{} {} track(s) to {}",
        style("Downloading").bold(),
        tracks.len(),
        output_dir.display()
    );
    println!(
        "Sources: {}  |  Format: {}  |  Concurrent: {}\n",
        sources.join(" → "),
        settings.preferred_format,
        settings.max_concurrent
    );

    let emitter = Arc::new(ProgressEmitter::new());
    let runner = build_runner(settings, output_dir, emitter)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());
    let summary = runner.run(tracks, cancel).await;
    ctrl_c.abort();

    print_summary(&summary);
    let failed_file = FailedTracksFile::path_in(output_dir);
    if failed_file.is_file() {
        println!(
            "\nFailed tracks saved to {}\nRun `spotify-downloader retry` to try them again.",
            failed_file.display()
        );
    }

    Ok(summary)
}

/// Cancel `token` on the first Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling: no new tracks will start, running downloads are stopped.");
            token.cancel();
        }
    })
}

fn print_track_list(tracks: &[Track]) {
    println!("{} track(s):", tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        println!("{}", track_list_line(i + 1, track));
    }
}

fn track_list_line(position: usize, track: &Track) -> String {
    let duration = if track.has_duration() {
        let secs = track.duration_ms / 1000;
        format!(" [{}:{:02}]", secs / 60, secs % 60)
    } else {
        String::new()
    };
    format!(
        "{position:>4}. {} ({}){duration}",
        track.display_name(),
        track.album
    )
}
