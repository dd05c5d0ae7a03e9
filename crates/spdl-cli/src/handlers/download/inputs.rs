//! Turning command-line inputs into tracks.

use std::path::{Path, PathBuf};

use spdl_core::{Track, TrackList, TrackResolverPort};

use crate::error::CliError;

/// What a command-line input refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A link the resolver understands (Spotify track/album/playlist).
    Link,
    /// A JSON track list on disk.
    File(PathBuf),
    /// A hand-written `"Artist - Title"` query.
    Query,
}

/// Decide how to read `input`.
pub fn classify_input(input: &str, resolver: &dyn TrackResolverPort) -> InputKind {
    if resolver.can_resolve(input) {
        return InputKind::Link;
    }
    let path = Path::new(input);
    if path.is_file() {
        return InputKind::File(path.to_path_buf());
    }
    InputKind::Query
}

fn looks_like_link(input: &str) -> bool {
    let lower = input.trim().to_lowercase();
    lower.starts_with("spotify:") || lower.contains("spotify.com/")
}

/// Read all inputs into one de-duplicated track list, keeping input order.
pub async fn collect_tracks(
    inputs: &[String],
    resolver: &dyn TrackResolverPort,
) -> Result<TrackList, CliError> {
    let mut list = TrackList::default();

    for input in inputs {
        match classify_input(input, resolver) {
            InputKind::Link => {
                let tracks = resolver.resolve(input).await?;
                tracing::info!(input = %input, count = tracks.len(), "Resolved link");
                list.extend_unique(tracks);
            }
            InputKind::File(path) => {
                let loaded = TrackList::load(&path)?;
                list.extend_unique(loaded.tracks);
            }
            InputKind::Query if looks_like_link(input) => {
                return Err(CliError::Arguments(format!(
                    "Unsupported Spotify link '{input}' (expected a track, album or playlist)"
                )));
            }
            InputKind::Query => list.extend_unique([Track::parse_query(input)?]),
        }
    }

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdl_core::ports::MockTrackResolverPort;
    use spdl_core::ResolveError;
    use spdl_core::domain::UNKNOWN_ALBUM;

    fn resolver() -> MockTrackResolverPort {
        let mut mock = MockTrackResolverPort::new();
        mock.expect_can_resolve()
            .returning(|input| input.starts_with("spotify:album:"));
        mock.expect_resolve().returning(|input| {
            if input.ends_with("missing") {
                Err(ResolveError::NotFound(input.to_string()))
            } else {
                Ok(vec![
                    Track::new("One", "Band", "Record").with_track_number(1),
                    Track::new("Two", "Band", "Record").with_track_number(2),
                ])
            }
        });
        mock
    }

    #[tokio::test]
    async fn test_collects_links_files_and_queries() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("tracks.json");
        std::fs::write(
            &file,
            r#"{"tracks": [{"name": "Three", "artist": "Band", "album": "Record"}]}"#,
        )
        .unwrap();

        let inputs = vec![
            "spotify:album:abc".to_string(),
            file.to_string_lossy().into_owned(),
            "Someone - Something".to_string(),
        ];
        let list = collect_tracks(&inputs, &resolver()).await.unwrap();

        let names: Vec<&str> = list.tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two", "Three", "Something"]);
        assert_eq!(list.tracks[3].artist, "Someone");
        assert_eq!(list.tracks[3].album, UNKNOWN_ALBUM);
    }

    #[tokio::test]
    async fn test_duplicate_inputs_are_merged() {
        let inputs = vec![
            "spotify:album:abc".to_string(),
            "spotify:album:abc".to_string(),
        ];
        let list = collect_tracks(&inputs, &resolver()).await.unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn test_resolver_errors_propagate() {
        let inputs = vec!["spotify:album:missing".to_string()];
        let err = collect_tracks(&inputs, &resolver()).await.unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_bad_inputs_are_argument_errors() {
        for input in ["just a title", "https://open.spotify.com/artist/xyz"] {
            let err = collect_tracks(&[input.to_string()], &resolver())
                .await
                .unwrap_err();
            assert!(matches!(err, CliError::Arguments(_)), "{input}");
        }
    }
}
