//! Filesystem-safe names.

/// Characters that are invalid in file names on at least one major platform.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters that are not allowed in file names with `_` and strip
/// leading/trailing spaces and dots.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    replaced.trim_matches(|c| c == ' ' || c == '.').to_string()
}
