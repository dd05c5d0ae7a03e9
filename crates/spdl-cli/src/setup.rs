//! Interactive first-time setup.
//!
//! Asks for the download folder, output format, quality (MP3 only),
//! concurrency and tagging preferences, then saves them.

use anyhow::{Context, Result};
use console::style;
use spdl_core::settings::MAX_CONCURRENT_LIMIT;
use spdl_core::{
    AudioFormat, AudioQuality, DirectoryCreationStrategy, Settings, SettingsRepository,
    SettingsUpdate, ensure_directory, normalize_user_path, validate_settings,
};

use crate::presentation::print_separator;
use crate::utils::input::{
    prompt_choice, prompt_number_in_range, prompt_string_with_default, prompt_yes_no,
};

/// Format menu entries, in `AudioFormat::ALL` order.
const FORMAT_LABELS: [&str; 6] = [
    "flac (lossless)",
    "mp3",
    "m4a (AAC)",
    "wav (uncompressed)",
    "opus",
    "vorbis (ogg)",
];

/// Run the wizard, save the answers and print a summary.
pub async fn run_and_save(repo: &dyn SettingsRepository, current: &Settings) -> Result<Settings> {
    let settings = prompt_settings(current)?;
    repo.save(&settings)
        .await
        .context("Failed to save settings")?;
    print_setup_summary(&settings);
    Ok(settings)
}

/// Ask every setup question, starting from `current`.
pub fn prompt_settings(current: &Settings) -> Result<Settings> {
    print_separator();
    println!("{}", style("spotify-downloader setup").bold());
    print_separator();
    println!("Press Enter to keep the value in brackets.\n");

    let folder = prompt_string_with_default(
        "Where should music be downloaded?",
        Some(current.effective_download_folder()),
    )?;
    let path = normalize_user_path(&folder)?;
    ensure_directory(&path, DirectoryCreationStrategy::AutoCreate)
        .with_context(|| format!("Cannot use {} for downloads", path.display()))?;

    let format_default = format_index(current.preferred_format);
    let format = AudioFormat::ALL[prompt_choice("\nPreferred format:", &FORMAT_LABELS, format_default)?];

    let quality = if format == AudioFormat::Mp3 {
        let labels = AudioQuality::ALLOWED.map(|kbps| format!("{kbps} kbps"));
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let default = quality_index(current.preferred_quality);
        let kbps = AudioQuality::ALLOWED[prompt_choice("\nMP3 quality:", &labels, default)?];
        AudioQuality::new(kbps).map_err(anyhow::Error::msg)?
    } else {
        current.preferred_quality
    };

    println!();
    let concurrent = prompt_number_in_range(
        "Simultaneous downloads",
        1,
        MAX_CONCURRENT_LIMIT,
        current.max_concurrent,
    )?;
    let embed_metadata = prompt_yes_no("Embed metadata (tags)?", current.embed_metadata)?;
    let embed_artwork =
        embed_metadata && prompt_yes_no("Embed album artwork?", current.embed_artwork)?;

    let update = SettingsUpdate {
        download_folder: Some(Some(path.to_string_lossy().into_owned())),
        preferred_format: Some(format),
        preferred_quality: Some(quality),
        max_concurrent: Some(concurrent),
        embed_metadata: Some(embed_metadata),
        embed_artwork: Some(embed_artwork),
        ..Default::default()
    };
    apply_answers(current, &update)
}

/// Merge wizard answers into `current` and validate.
pub fn apply_answers(current: &Settings, update: &SettingsUpdate) -> Result<Settings> {
    let mut next = current.clone();
    next.merge(update);
    validate_settings(&next)?;
    Ok(next)
}

fn format_index(format: AudioFormat) -> usize {
    AudioFormat::ALL
        .iter()
        .position(|f| *f == format)
        .unwrap_or_default()
}

fn quality_index(quality: AudioQuality) -> usize {
    AudioQuality::ALLOWED
        .iter()
        .position(|kbps| *kbps == quality.kbps())
        .unwrap_or(AudioQuality::ALLOWED.len() - 1)
}

/// Print the chosen settings after setup.
pub fn print_setup_summary(settings: &Settings) {
    println!();
    println!("{} Settings saved", style("✓").green());
    println!("  Download folder:   {}", settings.effective_download_folder());
    println!("  Format:            {}", settings.preferred_format);
    if settings.preferred_format.is_lossy() {
        println!("  Quality:           {} kbps", settings.preferred_quality);
    }
    println!("  Concurrent:        {}", settings.max_concurrent);
    println!("  Embed metadata:    {}", yes_no(settings.embed_metadata));
    println!(
        "  Embed artwork:     {}",
        yes_no(settings.effective_embed_artwork())
    );
    println!("\nChange these any time with `spotify-downloader config`.");
    println!();
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_labels_follow_format_order() {
        for (format, label) in AudioFormat::ALL.iter().zip(FORMAT_LABELS) {
            assert!(label.starts_with(format.codec()));
        }
        assert_eq!(format_index(AudioFormat::Mp3), 1);
    }

    #[test]
    fn test_quality_index() {
        assert_eq!(quality_index(AudioQuality::BEST), 3);
        assert_eq!(quality_index(AudioQuality::new(128).unwrap()), 0);
    }

    #[test]
    fn test_apply_answers() {
        let update = SettingsUpdate {
            download_folder: Some(Some("/music".to_string())),
            preferred_format: Some(AudioFormat::Mp3),
            max_concurrent: Some(3),
            embed_metadata: Some(false),
            embed_artwork: Some(true),
            ..Default::default()
        };
        let settings = apply_answers(&Settings::default(), &update).unwrap();

        assert!(settings.is_configured());
        assert_eq!(settings.preferred_format, AudioFormat::Mp3);
        assert_eq!(settings.max_concurrent, 3);
        assert!(!settings.embed_artwork);
    }

    #[test]
    fn test_apply_answers_rejects_invalid() {
        let update = SettingsUpdate {
            max_concurrent: Some(0),
            ..Default::default()
        };
        assert!(apply_answers(&Settings::default(), &update).is_err());
    }
}
