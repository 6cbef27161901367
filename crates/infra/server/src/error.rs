//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use weekboard_core::BoardError;

/// Wrapper for BoardError that implements IntoResponse.
///
/// Renders `{"error": <message>, "code": <status>}`. Non-user errors are
/// logged.
#[derive(Debug)]
pub struct ApiError(pub BoardError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if !self.0.is_user_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let message = self.0.to_string();

        let body = serde_json::json!({
            "error": message,
            "code": code
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        ApiError(err)
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
