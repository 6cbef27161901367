//! Request authorization extractors.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use tracing::warn;
use weekboard_core::BoardError;
use weekboard_session::{constant_time_compare, session_token};

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for collector writes.
///
/// Rejects the request with 401 unless it carries
/// `Authorization: Bearer <ingest secret>`. Without a configured ingest
/// secret every write is refused.
#[derive(Debug, Clone, Copy)]
pub struct CollectorAuth;

impl FromRequestParts<AppState> for CollectorAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if has_bearer_secret(parts, state) {
            Ok(CollectorAuth)
        } else {
            warn!(path = %parts.uri.path(), "rejected collector request");
            Err(ApiError(BoardError::Unauthorized))
        }
    }
}

/// Extractor for backfill requests: the collector bearer or a dashboard session.
#[derive(Debug, Clone, Copy)]
pub struct BackfillAuth;

impl FromRequestParts<AppState> for BackfillAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if has_bearer_secret(parts, state) || has_session(parts, state) {
            Ok(BackfillAuth)
        } else {
            warn!(path = %parts.uri.path(), "rejected backfill request");
            Err(ApiError(BoardError::Unauthorized))
        }
    }
}

/// Extracts bearer token from Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn has_bearer_secret(parts: &Parts, state: &AppState) -> bool {
    match (state.ingest_secret.as_deref(), bearer_token(parts)) {
        (Some(secret), Some(token)) => constant_time_compare(secret, token),
        _ => false,
    }
}

fn has_session(parts: &Parts, state: &AppState) -> bool {
    let Some(signer) = state.signer.as_ref() else {
        return false;
    };
    parts
        .headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(session_token)
        .is_some_and(|token| signer.verify(token))
}
