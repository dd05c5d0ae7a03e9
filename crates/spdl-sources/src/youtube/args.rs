//! `yt-dlp` argument lists.

use std::ffi::OsString;
use std::path::Path;

use super::protocol::PROGRESS_TEMPLATE;
use crate::config::YoutubeOptions;

/// Number of search results requested per query.
const SEARCH_RESULTS: u32 = 5;

pub fn search_args(query: &str) -> Vec<OsString> {
    [
        "--dump-json",
        "--flat-playlist",
        "--no-warnings",
        format!("ytsearch{SEARCH_RESULTS}:{query}").as_str(),
    ]
    .iter()
    .map(OsString::from)
    .collect()
}

/// Arguments for extracting audio from `url` into `<stem>.%(ext)s`.
pub fn download_args(url: &str, options: &YoutubeOptions, stem: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-f",
        "bestaudio/best",
        "-x",
        "--audio-format",
        options.format.codec(),
        "--audio-quality",
        format!("{}K", options.quality.kbps()).as_str(),
        "--retries",
        "3",
        "--fragment-retries",
        "3",
        "--http-chunk-size",
        "1M",
        "--socket-timeout",
        "30",
        "--no-check-certificates",
        "--newline",
        "--no-playlist",
        "--no-warnings",
        "--progress-template",
        PROGRESS_TEMPLATE,
    ]
    .iter()
    .map(OsString::from)
    .collect();

    if options.embed_metadata {
        args.push("--embed-metadata".into());
    }
    if options.embed_artwork {
        args.push("--embed-thumbnail".into());
    }

    let mut template = stem.as_os_str().to_os_string();
    template.push(".%(ext)s");
    args.push("-o".into());
    args.push(template);
    args.push(url.into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdl_core::{AudioFormat, AudioQuality};

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_search_args() {
        let args = strings(&search_args("Radiohead - Karma Police"));
        assert_eq!(
            args,
            vec![
                "--dump-json",
                "--flat-playlist",
                "--no-warnings",
                "ytsearch5:Radiohead - Karma Police"
            ]
        );
    }

    #[test]
    fn test_download_args() {
        let options = YoutubeOptions {
            format: AudioFormat::Mp3,
            quality: AudioQuality::new(192).unwrap(),
            embed_metadata: true,
            embed_artwork: false,
        };
        let args = strings(&download_args(
            "https://www.youtube.com/watch?v=abc",
            &options,
            Path::new("/music/01 - Radiohead - Karma Police"),
        ));

        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("--audio-format") + 1], "mp3");
        assert_eq!(args[pos("--audio-quality") + 1], "192K");
        assert_eq!(args[pos("-o") + 1], "/music/01 - Radiohead - Karma Police.%(ext)s");
        assert_eq!(
            args[pos("--progress-template") + 1],
            "download:[spdl] %(progress.downloaded_bytes)s/%(progress.total_bytes)s"
        );
        assert!(args.contains(&"--embed-metadata".to_string()));
        assert!(!args.contains(&"--embed-thumbnail".to_string()));
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc");
    }
}
