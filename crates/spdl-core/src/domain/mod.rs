//! Domain types describing what the user wants downloaded.

mod track;

pub use track::{Track, TrackList, TrackListError, UNKNOWN_ALBUM};
