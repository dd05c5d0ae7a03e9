//! Internal error types for the source adapters.
//!
//! These errors are internal to `spdl-sources` and are mapped to
//! `DownloadError` / `ResolveError` at the port boundary.

use thiserror::Error;

/// Result type alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised while talking to a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Request failed with an HTTP error status.
    #[error("Request failed with status {status}: {url}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Nothing usable at the source for this item.
    #[error("{message}")]
    NotFound {
        /// What was missing
        message: String,
    },

    /// The server did not send audio.
    #[error("Expected audio but got content type '{content_type}'")]
    NotAudio {
        /// The `Content-Type` header value
        content_type: String,
    },

    /// A downloaded file was too small to be a real track.
    #[error("Downloaded file too small ({size} bytes), probably not valid")]
    TooSmall {
        /// File size in bytes
        size: u64,
    },

    /// A required external program is not installed.
    #[error("{tool} not found")]
    ToolMissing {
        /// Program name
        tool: String,
    },

    /// An external program failed.
    #[error("{tool} failed: {message}")]
    Process {
        /// Program name
        tool: String,
        /// Exit status or stderr
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let error = SourceError::HttpStatus {
            status: 503,
            url: "https://archive.org/metadata/x".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("archive.org"));
    }

    #[test]
    fn test_not_audio_message() {
        let error = SourceError::NotAudio {
            content_type: "text/html".to_string(),
        };
        assert!(error.to_string().contains("text/html"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let error: SourceError = io.into();
        assert!(matches!(error, SourceError::Io(_)));
    }
}
