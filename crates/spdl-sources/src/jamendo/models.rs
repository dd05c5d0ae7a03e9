//! Jamendo v3.0 API response types.

use serde::{Deserialize, Deserializer};

/// `tracks` endpoint response.
#[derive(Debug, Deserialize)]
pub struct TracksResponse {
    #[serde(default)]
    pub headers: ResponseHeaders,
    #[serde(default)]
    pub results: Vec<JamendoTrack>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseHeaders {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error_message: String,
}

impl ResponseHeaders {
    /// An empty status is accepted; some mirrors omit headers.
    pub fn is_success(&self) -> bool {
        self.status.is_empty() || self.status == "success"
    }
}

/// A track hit.
#[derive(Debug, Clone, Deserialize)]
pub struct JamendoTrack {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub shareurl: Option<String>,
}

/// Jamendo sends ids as strings, older responses as numbers.
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
