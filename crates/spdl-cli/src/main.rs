//! CLI entry point.
//!
//! Loads `.env` files, sets up logging, bootstraps the `CliContext` and
//! dispatches to the command handlers.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use console::style;
use tracing_subscriber::EnvFilter;

use spdl_cli::{
    Cli, CliConfig, Commands, batch_exit_code, bootstrap, exit_code_for, handlers,
};

const VERBOSE_FILTER: &str = "info,spdl_core=debug,spdl_sources=debug,spdl_download=debug,spdl_cli=debug";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    load_env_files();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => exit_code(code),
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            exit_code(exit_code_for(&err))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(0);
    };

    // Commands that don't need settings
    if matches!(command, Commands::CheckDeps) {
        handlers::check_deps::execute().await?;
        return Ok(0);
    }

    let ctx = bootstrap(CliConfig { output: cli.output }).await?;

    match command {
        Commands::Download(args) => {
            let summary = handlers::download::execute(&ctx, args).await?;
            return Ok(batch_exit_code(summary.as_ref()));
        }
        Commands::Retry { options } => {
            let summary = handlers::retry::execute(&ctx, options).await?;
            return Ok(batch_exit_code(summary.as_ref()));
        }
        Commands::Sources { check } => handlers::sources::execute(&ctx, check).await?,
        Commands::Stats => handlers::stats::execute(&ctx)?,
        Commands::Config { command } => handlers::config::execute(&ctx, command).await?,
        Commands::Paths => handlers::paths::execute(&ctx)?,
        Commands::CheckDeps => handlers::check_deps::execute().await?,
    }
    Ok(0)
}

/// Load `.env` from the data directory, then from the working directory.
///
/// Values already in the environment are never overridden.
fn load_env_files() {
    if let Ok(path) = spdl_core::env_file_path() {
        if path.is_file() {
            if let Err(e) = dotenvy::from_path(&path) {
                eprintln!("Warning: failed to load {}: {e}", path.display());
            }
        }
    }
    dotenvy::dotenv().ok();
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
