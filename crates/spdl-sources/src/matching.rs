//! Helpers shared by the source scoring functions.

use serde::{Deserialize, Deserializer};

/// Lowercase and trim for case-insensitive comparisons.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Whether two durations (in seconds) are within `tolerance` seconds.
pub fn within_seconds(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// A JSON field that may be a single string or a list of strings.
///
/// archive.org returns `creator`, `title` and `format` either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringOrList(pub Vec<String>);

impl StringOrList {
    /// All values joined with a space, for substring checks.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }

    /// First value, if any.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Whether any value equals `needle` exactly.
    pub fn contains_exact(&self, needle: &str) -> bool {
        self.0.iter().any(|v| v == needle)
    }
}

impl<'de> Deserialize<'de> for StringOrList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(s) => Self(vec![s]),
            Raw::Many(v) => Self(v),
            Raw::Null(()) => Self::default(),
        })
    }
}
