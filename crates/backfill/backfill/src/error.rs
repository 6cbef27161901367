//! Backfill error types.

use thiserror::Error;
use weekboard_core::BoardError;

/// Result type for backfill operations.
pub type BackfillResult<T> = Result<T, BackfillError>;

/// Error type for backfill operations.
#[derive(Debug, Error)]
pub enum BackfillError {
    /// No webhook URL configured.
    #[error("Backfill webhook is not configured")]
    NotConfigured,

    /// The configured URL does not parse.
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    /// The collector answered with a non-2xx status.
    #[error("Webhook answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// HTTP error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Timeout.
    #[error("Request timeout")]
    Timeout,
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for BackfillError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackfillError::Timeout
        } else {
            BackfillError::HttpError(err.to_string())
        }
    }
}

impl From<BackfillError> for BoardError {
    fn from(err: BackfillError) -> Self {
        match err {
            BackfillError::NotConfigured => BoardError::BackfillNotConfigured,
            BackfillError::InvalidUrl(url) => BoardError::config(format!("invalid backfill URL: {url}")),
            other => BoardError::backfill(other.to_string()),
        }
    }
}
