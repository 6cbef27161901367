//! Error types for Weekboard.
//!
//! This module defines the `BoardError` enum which represents every failure
//! the dashboard core and its collaborators can surface to a caller.

use thiserror::Error;

/// The main error type for Weekboard operations.
///
/// Absent metric values are not errors: they are modelled as `None` and
/// flow through the fallback chains. Only malformed input and collaborator
/// failures end up here.
#[derive(Debug, Error)]
pub enum BoardError {
    // ==================== Validation Errors ====================
    /// The week selector is neither `current` nor `YYYY-WNN`.
    #[error("Invalid week format: {value}. Use \"current\" or \"YYYY-WNN\"")]
    InvalidWeekSelector { value: String },

    /// A slot tag outside `08:00`, `18:00` and `latest`.
    #[error("Unknown time slot: {value}")]
    UnknownTimeSlot { value: String },

    /// A field name outside the recognized metric set.
    #[error("Unknown metric field: {value}")]
    UnknownField { value: String },

    /// A field value is invalid.
    #[error("Invalid field value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The field is read per slot and has no daily value policy.
    #[error("Metric field '{field}' has no daily value policy")]
    NoDailyPolicy { field: String },

    /// A calendar date could not be parsed or is out of range.
    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    // ==================== Auth Errors ====================
    /// The request carries no valid session or bearer secret.
    #[error("Unauthorized")]
    Unauthorized,

    /// The submitted password is wrong.
    #[error("Incorrect password")]
    InvalidCredentials,

    // ==================== Collaborator Errors ====================
    /// The metrics store could not be reached or failed.
    #[error("Metrics store error: {message}")]
    StoreUnavailable { message: String },

    /// The backfill trigger has no target configured.
    #[error("Backfill webhook is not configured")]
    BackfillNotConfigured,

    /// The backfill trigger was rejected or could not be delivered.
    #[error("Backfill failed: {message}")]
    BackfillFailed { message: String },

    // ==================== Configuration Errors ====================
    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// A required configuration value is missing.
    #[error("Missing configuration: {key}")]
    MissingConfiguration { key: String },

    // ==================== Serialization Errors ====================
    /// Serialization/deserialization failed.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl BoardError {
    /// Creates a new invalid week selector error.
    pub fn invalid_week(value: impl Into<String>) -> Self {
        Self::InvalidWeekSelector {
            value: value.into(),
        }
    }

    /// Creates a new invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new invalid date error.
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Creates a new store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new backfill failure.
    pub fn backfill(message: impl Into<String>) -> Self {
        Self::BackfillFailed {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Returns true if this is a user-facing error (vs internal).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidWeekSelector { .. }
                | Self::UnknownTimeSlot { .. }
                | Self::UnknownField { .. }
                | Self::InvalidField { .. }
                | Self::NoDailyPolicy { .. }
                | Self::InvalidDate { .. }
                | Self::Unauthorized
                | Self::InvalidCredentials
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidWeekSelector { .. }
            | Self::UnknownTimeSlot { .. }
            | Self::UnknownField { .. }
            | Self::InvalidDate { .. }
            | Self::SerializationError { .. } => 400,
            Self::Unauthorized | Self::InvalidCredentials => 401,
            Self::InvalidField { .. } | Self::NoDailyPolicy { .. } => 422,
            Self::BackfillFailed { .. } => 502,
            Self::StoreUnavailable { .. } => 503,
            _ => 500,
        }
    }
}

/// A Result type alias using BoardError.
pub type BoardResult<T> = Result<T, BoardError>;

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}
