//! Parsing of `yt-dlp` stdout lines.

use serde::Deserialize;

/// Marker that starts the progress lines we ask `yt-dlp` to print.
pub const PROGRESS_MARKER: &str = "[spdl]";

/// Value for `--progress-template`. The leading `download:` selects the
/// progress type and is not printed; only the marker and the counts are.
pub const PROGRESS_TEMPLATE: &str =
    "download:[spdl] %(progress.downloaded_bytes)s/%(progress.total_bytes)s";

/// One `--dump-json --flat-playlist` search entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    /// Seconds; flat entries sometimes omit it.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
}

impl SearchEntry {
    pub fn channel_name(&self) -> &str {
        self.channel
            .as_deref()
            .or(self.uploader.as_deref())
            .unwrap_or_default()
    }

    pub fn watch_url(&self) -> String {
        self.webpage_url
            .clone()
            .or_else(|| self.url.clone().filter(|u| u.starts_with("http")))
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", self.id))
    }
}

/// Parse search output, one JSON object per line. Malformed lines are skipped.
pub fn parse_search_output(stdout: &str) -> Vec<SearchEntry> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .filter_map(|line| match serde_json::from_str::<SearchEntry>(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unparsable yt-dlp line");
                None
            }
        })
        .collect()
}

/// Parse a `[spdl] <downloaded>/<total>` line.
///
/// `yt-dlp` prints `NA` for unknown values; an unknown total becomes 0 and an
/// unknown downloaded count makes the line unusable.
pub fn parse_progress_line(line: &str) -> Option<(u64, u64)> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let (downloaded, total) = rest.split_once('/')?;
    let downloaded = parse_count(downloaded)?;
    let total = parse_count(total).unwrap_or(0);
    Some((downloaded, total))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("na") || value.eq_ignore_ascii_case("none") {
        return None;
    }
    value
        .parse::<u64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|v| v.max(0.0) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_line() {
        assert_eq!(parse_progress_line("[spdl] 1024/4096"), Some((1024, 4096)));
        assert_eq!(parse_progress_line("[spdl] 1024/NA"), Some((1024, 0)));
        assert_eq!(parse_progress_line("[spdl] 2048.0/4096.5"), Some((2048, 4096)));
        assert_eq!(parse_progress_line("[spdl] NA/NA"), None);
        assert_eq!(parse_progress_line("[ExtractAudio] Destination: x.flac"), None);
    }

    #[test]
    fn test_progress_lines_as_printed_by_yt_dlp() {
        // yt-dlp consumes the `download:` type selector and prints the rest.
        let printed = PROGRESS_TEMPLATE
            .strip_prefix("download:")
            .unwrap()
            .replace("%(progress.downloaded_bytes)s", "524288")
            .replace("%(progress.total_bytes)s", "NA");
        assert_eq!(printed, "[spdl] 524288/NA");
        assert_eq!(parse_progress_line(&printed), Some((524_288, 0)));

        assert_eq!(parse_progress_line("1024/4096"), None);
        assert_eq!(parse_progress_line("  [spdl] 10/20  "), Some((10, 20)));
    }

    #[test]
    fn test_parse_search_output() {
        let stdout = concat!(
            r#"{"id": "abc", "title": "Song", "channel": "Artist", "duration": 201.0}"#,
            "\n",
            "WARNING: something\n",
            r#"{"id": "def", "title": "Other", "uploader": "Up", "url": "https://www.youtube.com/watch?v=def"}"#,
            "\n",
            "{not json}\n",
        );
        let entries = parse_search_output(stdout);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].channel_name(), "Artist");
        assert_eq!(entries[0].watch_url(), "https://www.youtube.com/watch?v=abc");
        assert_eq!(entries[1].channel_name(), "Up");
        assert_eq!(entries[1].watch_url(), "https://www.youtube.com/watch?v=def");
        assert!(entries[1].duration.is_none());
    }
}
