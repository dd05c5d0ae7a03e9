//! Download error types.
//!
//! These errors are designed to be serializable and not depend on external
//! error types like `std::io::Error`. For I/O errors, we capture the kind
//! and message as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::SourceKind;

/// Error type for download operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// I/O error during file operations.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "not found", "permission denied").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// Network/HTTP error during search or download.
    #[error("Network error: {message}")]
    Network {
        /// Detailed error message.
        message: String,
        /// HTTP status code if available.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// The track or file was not found on the remote side.
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found.
        message: String,
    },

    /// A remote API returned something we could not use.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of what was invalid.
        message: String,
    },

    /// A required external program is not installed.
    #[error("Required tool '{tool}' was not found on PATH")]
    ToolMissing {
        /// Program name (e.g. `yt-dlp`).
        tool: String,
    },

    /// An external program exited unsuccessfully.
    #[error("{tool} failed: {message}")]
    ProcessFailed {
        /// Program name.
        tool: String,
        /// Exit status and trailing stderr.
        message: String,
    },

    /// The downloaded file failed validation.
    #[error("Incomplete download: {message}")]
    Incomplete {
        /// Why the file was rejected.
        message: String,
    },

    /// Download was cancelled by the user.
    #[error("Download cancelled")]
    Cancelled,

    /// Every enabled source was tried without success.
    #[error("Failed to download from all sources ({})", format_sources(attempted))]
    AllSourcesFailed {
        /// Sources that were tried, in order.
        attempted: Vec<SourceKind>,
    },

    /// General/uncategorized error.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

fn format_sources(sources: &[SourceKind]) -> String {
    if sources.is_empty() {
        return "none enabled".to_string();
    }
    sources
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl DownloadError {
    /// Create an I/O error from kind and message strings.
    pub fn io(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error from a `std::io::Error`.
    ///
    /// This captures the error kind name and message for serialization.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a network error with HTTP status code.
    pub fn network_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Network {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a not found error.
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

    /// Create a missing tool error.
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    /// Create a failed process error.
    pub fn process_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProcessFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an incomplete download error.
    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::Incomplete {
            message: message.into(),
        }
    }

    /// Create a general error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether this error is a user cancellation.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether retrying the same source might succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::ProcessFailed { .. } | Self::Incomplete { .. }
        )
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}
