//! Session error types.

use thiserror::Error;
use weekboard_core::BoardError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Error type for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No dashboard secret configured.
    #[error("Authentication not configured")]
    NotConfigured,

    /// The secret cannot key the MAC.
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Wrong password.
    #[error("Incorrect password")]
    InvalidPassword,
}

impl From<SessionError> for BoardError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotConfigured => BoardError::MissingConfiguration {
                key: "DASHBOARD_SECRET".to_string(),
            },
            SessionError::InvalidKey(message) => BoardError::config(message),
            SessionError::InvalidPassword => BoardError::InvalidCredentials,
        }
    }
}
