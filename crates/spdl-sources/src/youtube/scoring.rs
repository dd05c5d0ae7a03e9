//! Query building and match scoring for YouTube search results.

use spdl_core::Track;

use super::protocol::SearchEntry;
use crate::matching::{normalize, within_seconds};

/// Minimum score for a search hit to be used.
pub const MATCH_THRESHOLD: i32 = 40;

/// Words that mark a different rendition of the song.
const PENALTY_WORDS: [&str; 5] = ["live", "cover", "remix", "karaoke", "instrumental"];

/// Search query for the given 1-based attempt.
pub fn query_for_attempt(track: &Track, attempt: u32) -> String {
    match attempt {
        0 | 1 => format!("{} - {}", track.artist, track.name),
        2 => format!("{} {} official audio", track.artist, track.name),
        _ => format!("{} {} lyrics", track.artist, track.name),
    }
}

/// Score a search entry against the wanted track.
pub fn score_entry(track: &Track, entry: &SearchEntry) -> i32 {
    let title = normalize(&entry.title);
    let channel = normalize(entry.channel_name());
    let wanted_title = normalize(&track.name);
    let wanted_artist = normalize(&track.artist);

    let mut score = 0;
    if !wanted_title.is_empty() && title.contains(&wanted_title) {
        score += 40;
    }
    if !wanted_artist.is_empty()
        && (title.contains(&wanted_artist) || channel.contains(&wanted_artist))
    {
        score += 30;
    }

    if let (true, Some(duration)) = (track.has_duration(), entry.duration) {
        let expected = track.duration_secs();
        if within_seconds(expected, duration, 10.0) {
            score += 20;
        } else if within_seconds(expected, duration, 30.0) {
            score += 10;
        }
    }

    for word in PENALTY_WORDS {
        if contains_word(&title, word) && !contains_word(&wanted_title, word) {
            score -= 30;
        }
    }
    score
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

/// Highest scoring entry at or above the threshold. Ties keep the earlier entry.
pub fn find_best_match<'a>(track: &Track, entries: &'a [SearchEntry]) -> Option<(&'a SearchEntry, i32)> {
    let mut best: Option<(&SearchEntry, i32)> = None;
    for entry in entries {
        let score = score_entry(track, entry);
        tracing::debug!(title = %entry.title, score, "Scored YouTube result");
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((entry, score));
        }
    }
    best.filter(|(_, score)| *score >= MATCH_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new("Karma Police", "Radiohead", "OK Computer").with_duration_ms(264_000)
    }

    fn entry(title: &str, channel: &str, duration: Option<f64>) -> SearchEntry {
        SearchEntry {
            id: "x".to_string(),
            title: title.to_string(),
            channel: Some(channel.to_string()),
            uploader: None,
            duration,
            url: None,
            webpage_url: None,
        }
    }

    #[test]
    fn test_queries_per_attempt() {
        assert_eq!(query_for_attempt(&track(), 1), "Radiohead - Karma Police");
        assert_eq!(query_for_attempt(&track(), 2), "Radiohead Karma Police official audio");
        assert_eq!(query_for_attempt(&track(), 3), "Radiohead Karma Police lyrics");
    }

    #[test]
    fn test_score_official_upload() {
        let official = entry("Radiohead - Karma Police", "Radiohead", Some(264.0));
        assert_eq!(score_entry(&track(), &official), 90);

        let close = entry("Karma Police", "Radiohead", Some(284.0));
        assert_eq!(score_entry(&track(), &close), 80);

        let far = entry("Karma Police", "RadioheadVEVO", Some(400.0));
        assert_eq!(score_entry(&track(), &far), 70);
    }

    #[test]
    fn test_penalties() {
        let live = entry("Radiohead - Karma Police (Live at Glastonbury)", "fan", Some(280.0));
        assert_eq!(score_entry(&track(), &live), 50);

        let karaoke_cover = entry("Karma Police karaoke cover", "someone", None);
        assert_eq!(score_entry(&track(), &karaoke_cover), -20);

        let live_track = Track::new("Live Forever", "Oasis", "Definitely Maybe");
        let live_entry = entry("Oasis - Live Forever", "Oasis", None);
        assert_eq!(score_entry(&live_track, &live_entry), 70);
    }

    #[test]
    fn test_best_match() {
        let entries = vec![
            entry("Karma Police karaoke", "someone", None),
            entry("Radiohead - Karma Police", "Radiohead", Some(263.0)),
        ];
        let (best, score) = find_best_match(&track(), &entries).unwrap();
        assert_eq!(best.title, "Radiohead - Karma Police");
        assert_eq!(score, 90);

        let weak = vec![entry("Something else", "Radiohead", None)];
        assert!(find_best_match(&track(), &weak).is_none());
    }
}
