//! Error types for ClinicDesk media loading

use thiserror::Error;

use crate::kind::MediaKind;

/// User-facing text for a failed media load.
pub const MEDIA_FAILURE_MESSAGE: &str = "Failed to load media";

/// User-facing text for a failed document load.
pub const DOCUMENT_FAILURE_MESSAGE: &str = "Failed to load document";

/// Main error type for media loading operations
#[derive(Error, Debug)]
pub enum MediaError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status
    #[error("Unexpected status {status} for {reference}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Resource reference that was requested
        reference: String,
    },

    /// Request exceeded the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Payload larger than the configured cap
    #[error("Payload too large: {size} bytes (limit {limit} bytes)")]
    TooLarge {
        /// Announced or received size
        size: u64,
        /// Configured maximum
        limit: u64,
    },

    /// Payload cannot be interpreted as the declared media kind
    #[error("Decode error: {0}")]
    Decode(String),

    /// Reference cannot be turned into a fetchable URL
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Configuration is missing or malformed
    #[error("Config error: {0}")]
    Config(String),

    /// Handle registry refused an operation
    #[error("Handle error: {0}")]
    Handle(String),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MediaError {
    /// Stable message shown to the end user in place of this error.
    ///
    /// The raw error text is for diagnostics only and never reaches the UI.
    pub fn user_message(&self, kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Document => DOCUMENT_FAILURE_MESSAGE,
            MediaKind::Image | MediaKind::Video | MediaKind::Audio => MEDIA_FAILURE_MESSAGE,
        }
    }

    /// Whether the failure happened before any byte reached us.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            MediaError::Transport(_) | MediaError::Timeout(_) | MediaError::Status { .. }
        )
    }
}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MediaError::Timeout(err.to_string())
        } else if err.is_decode() || err.is_body() {
            MediaError::Decode(err.to_string())
        } else {
            MediaError::Transport(err.to_string())
        }
    }
}

/// Result type alias using MediaError
pub type MediaResult<T> = Result<T, MediaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MediaError::Status {
            status: 404,
            reference: "/media/42".to_string(),
        };
        assert_eq!(format!("{}", err), "Unexpected status 404 for /media/42");
    }

    #[test]
    fn test_user_message_never_leaks_cause() {
        let err = MediaError::Transport("connection refused: 10.0.0.7:443".to_string());
        assert_eq!(err.user_message(MediaKind::Image), "Failed to load media");
        assert_eq!(err.user_message(MediaKind::Audio), "Failed to load media");
        assert_eq!(err.user_message(MediaKind::Document), "Failed to load document");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MediaError = io_err.into();
        assert!(matches!(err, MediaError::Io(_)));
        assert!(!err.is_network());
    }
}
