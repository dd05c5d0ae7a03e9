//! Config command handler.
//!
//! Shows, edits and resets the saved settings.

use anyhow::{Context, Result};
use console::style;
use serde_json::Value;
use spdl_core::settings::SETTING_KEYS;
use spdl_core::{
    DirectoryCreationStrategy, Settings, ensure_directory, env_file_path, normalize_user_path,
    persist_env_value,
};
use spdl_sources::{SPOTIFY_CLIENT_ID_ENV, SPOTIFY_CLIENT_SECRET_ENV};

use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::error::CliError;
use crate::setup;
use crate::utils::input::prompt_confirmation;

/// Execute a config subcommand.
pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::SetDownloadFolder { path, no_create } => {
            set_download_folder(ctx, &path, no_create).await
        }
        ConfigCommand::Set { key, value } => set(ctx, &key, &value).await,
        ConfigCommand::Reset { force } => reset(ctx, force).await,
        ConfigCommand::SetCredentials {
            client_id,
            client_secret,
        } => set_credentials(&client_id, &client_secret),
        ConfigCommand::Setup => {
            setup::run_and_save(ctx.settings_repo.as_ref(), &ctx.settings).await?;
            Ok(())
        }
    }
}

fn show(ctx: &CliContext) -> Result<()> {
    println!("{}", style("Current settings:").bold());
    for (key, value) in setting_rows(&ctx.settings)? {
        println!("  {key:<24} {value}");
    }

    let dir = ctx.download_dir(&ctx.settings)?;
    println!(
        "\nDownloads go to {} ({})",
        dir.path.display(),
        dir.source.describe()
    );
    Ok(())
}

/// Every settable key with its current value, in `SETTING_KEYS` order.
pub fn setting_rows(settings: &Settings) -> Result<Vec<(&'static str, String)>> {
    let value = serde_json::to_value(settings).context("Failed to serialize settings")?;
    Ok(SETTING_KEYS
        .iter()
        .map(|key| {
            let shown = value
                .get(*key)
                .map_or_else(|| "(not set)".to_string(), render_value);
            (*key, shown)
        })
        .collect())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "(not set)".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

async fn set_download_folder(ctx: &CliContext, raw: &str, no_create: bool) -> Result<()> {
    let path = normalize_user_path(raw)?;
    let strategy = if no_create {
        DirectoryCreationStrategy::Disallow
    } else {
        DirectoryCreationStrategy::AutoCreate
    };
    ensure_directory(&path, strategy)?;

    let shown = path.to_string_lossy().into_owned();
    set(ctx, "download_folder", &shown).await
}

async fn set(ctx: &CliContext, key: &str, value: &str) -> Result<()> {
    let mut settings = ctx.settings.clone();
    settings.set_key(key, value)?;
    ctx.settings_repo
        .save(&settings)
        .await
        .context("Failed to save settings")?;
    println!("{} {key} = {value}", style("✓").green());
    Ok(())
}

fn set_credentials(client_id: &str, client_secret: &str) -> Result<()> {
    let (client_id, client_secret) = (client_id.trim(), client_secret.trim());
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(CliError::Arguments("Client id and secret must not be empty".to_string()).into());
    }
    persist_env_value(SPOTIFY_CLIENT_ID_ENV, client_id)?;
    persist_env_value(SPOTIFY_CLIENT_SECRET_ENV, client_secret)?;
    println!(
        "{} Spotify credentials saved to {}",
        style("✓").green(),
        env_file_path()?.display()
    );
    Ok(())
}

async fn reset(ctx: &CliContext, force: bool) -> Result<()> {
    if !force && !prompt_confirmation("Reset all settings to defaults?")? {
        println!("Cancelled.");
        return Ok(());
    }
    ctx.settings_repo
        .reset()
        .await
        .context("Failed to reset settings")?;
    println!("{} Settings reset to defaults", style("✓").green());
    Ok(())
}
