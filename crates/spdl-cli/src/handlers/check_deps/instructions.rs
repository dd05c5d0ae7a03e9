//! Installation hints for missing dependencies.

use console::style;

use super::{Dependency, FFMPEG_PROGRAM};
use spdl_download::FFPROBE_PROGRAM;
use spdl_sources::{YTDLP_PATH_ENV, YTDLP_PROGRAM};

/// Print install commands covering every missing dependency.
pub fn print_installation_instructions(missing: &[&Dependency]) {
    println!(
        "\n{}",
        style("Installation Instructions:").bold().blue()
    );
    println!("{}", "=".repeat(60));

    for (title, command) in install_commands(missing) {
        println!("\n{}", style(format!("{title}:")).bold());
        println!("  {}", style(format!("$ {command}")).blue());
    }

    if missing.iter().any(|d| d.name == YTDLP_PROGRAM) {
        println!(
            "\nA yt-dlp outside PATH can be used by setting {YTDLP_PATH_ENV}=/path/to/yt-dlp"
        );
    }
}

/// Package-manager commands installing the missing programs.
fn install_commands(missing: &[&Dependency]) -> Vec<(&'static str, String)> {
    let needs_ytdlp = missing.iter().any(|d| d.name == YTDLP_PROGRAM);
    let needs_ffmpeg = missing
        .iter()
        .any(|d| d.name == FFMPEG_PROGRAM || d.name == FFPROBE_PROGRAM);

    let mut packages = Vec::new();
    if needs_ytdlp {
        packages.push(YTDLP_PROGRAM);
    }
    if needs_ffmpeg {
        packages.push(FFMPEG_PROGRAM);
    }
    if packages.is_empty() {
        return Vec::new();
    }
    let list = packages.join(" ");

    let mut commands = vec![
        ("Arch Linux", format!("sudo pacman -S {list}")),
        ("Debian/Ubuntu", format!("sudo apt install {list}")),
        ("macOS (Homebrew)", format!("brew install {list}")),
    ];
    if needs_ytdlp {
        commands.push(("Any platform (pip)", format!("pip install -U {YTDLP_PROGRAM}")));
    }
    commands
}
