//! Route handlers.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use http::header::SET_COOKIE;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use weekboard_core::calendar::{MAX_TREND_WEEKS, MIN_TREND_WEEKS};
use weekboard_core::{
    BackfillRequest, BoardError, SnapshotRow, SnapshotUpsert, TimeSlot, TrendReport, WeekView,
};
use weekboard_session::{safe_redirect, session_cookie, SessionError, LOGIN_PATH};

use crate::error::ApiResult;
use crate::extract::{BackfillAuth, CollectorAuth};
use crate::state::AppState;

/// Weeks the trend endpoints cover when `weeks` is absent.
pub const DEFAULT_TREND_WEEKS: u32 = 4;

/// Creates the router with every dashboard route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/api/metrics", get(get_metrics).post(post_metrics))
        .route("/api/metrics/version", get(metrics_version))
        .route("/api/dashboard", get(dashboard))
        .route("/api/trends", get(trends))
        .route("/api/backfill", post(backfill))
        .fallback(not_found)
}

async fn not_found() -> Response {
    let body = serde_json::json!({
        "error": "Not found",
        "code": 404
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

// ==================== Metrics ====================

#[derive(Debug, Default, Deserialize)]
struct MetricsQuery {
    week: Option<String>,
    weeks: Option<String>,
}

/// Raw rows of a week or a trend span.
#[derive(Debug, Serialize)]
struct MetricsResponse {
    week: NaiveDate,
    #[serde(rename = "weekEnd")]
    week_end: NaiveDate,
    metrics: Vec<SnapshotRow>,
}

async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> ApiResult<Json<MetricsResponse>> {
    let (span, metrics) = match query.weeks.as_deref() {
        Some(weeks) => state.service.span_rows(parse_weeks(Some(weeks))?).await?,
        None => {
            let (window, rows) = state.service.week_rows(week_selector(query.week.as_deref())).await?;
            (window.span(), rows)
        }
    };

    Ok(Json(MetricsResponse {
        week: span.start,
        week_end: span.end,
        metrics,
    }))
}

async fn post_metrics(
    _auth: CollectorAuth,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    let patch: SnapshotUpsert = serde_json::from_slice(&body).map_err(BoardError::from)?;
    let row = state.service.ingest(&patch).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "collected_at": row.collected_at
    })))
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    v: Option<DateTime<Utc>>,
}

async fn metrics_version(State(state): State<AppState>) -> ApiResult<Json<VersionResponse>> {
    let v = state.service.data_version().await?;
    Ok(Json(VersionResponse { v }))
}

// ==================== Dashboard ====================

#[derive(Debug, Default, Deserialize)]
struct WeekQuery {
    week: Option<String>,
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Json<WeekView>> {
    let view = state.service.week_view(week_selector(query.week.as_deref())).await?;
    Ok(Json(view))
}

#[derive(Debug, Default, Deserialize)]
struct TrendsQuery {
    weeks: Option<String>,
}

async fn trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> ApiResult<Json<TrendReport>> {
    let weeks = parse_weeks(query.weeks.as_deref())?;
    let report = state.service.trends(weeks).await?;
    Ok(Json(report))
}

// ==================== Backfill ====================

#[derive(Debug, Serialize)]
struct BackfillResponse {
    triggered: bool,
    date: NaiveDate,
    time_slot: TimeSlot,
}

async fn backfill(
    _auth: BackfillAuth,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<BackfillResponse>> {
    let request: BackfillRequest = serde_json::from_slice(&body).map_err(BoardError::from)?;
    state.service.backfill(&request).await?;

    Ok(Json(BackfillResponse {
        triggered: true,
        date: request.date,
        time_slot: request.time_slot,
    }))
}

// ==================== Login ====================

#[derive(Debug, Default, Deserialize)]
struct LoginQuery {
    redirect: Option<String>,
}

async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(render_login(query.redirect.as_deref().unwrap_or("/"), None))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginForm {
    password: String,
    redirect: String,
}

async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let redirect = if form.redirect.is_empty() { "/" } else { form.redirect.as_str() };

    let result = match state.signer.as_ref() {
        Some(signer) => signer.login(&form.password),
        None => Err(SessionError::NotConfigured),
    };

    match result {
        Ok(token) => {
            info!("dashboard login");
            (
                AppendHeaders([(SET_COOKIE, session_cookie(token, state.cookie))]),
                Redirect::to(safe_redirect(redirect)),
            )
                .into_response()
        }
        Err(err) => {
            let message = err.to_string();
            warn!(error = %message, "login failed");
            let code = BoardError::from(err).status_code();
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Html(render_login(redirect, Some(&message)))).into_response()
        }
    }
}

fn render_login(redirect: &str, error: Option<&str>) -> String {
    let error = error
        .map(|message| format!("<p class=\"error\">{}</p>", escape_html(message)))
        .unwrap_or_default();
    format!(
        "<!doctype html>\n<html lang=\"nl\">\n<head><meta charset=\"utf-8\"><title>Support Dashboard</title></head>\n<body>\n<h1>Support Dashboard</h1>\n<form method=\"post\" action=\"{LOGIN_PATH}\">\n<input type=\"hidden\" name=\"redirect\" value=\"{}\">\n<input type=\"password\" name=\"password\" placeholder=\"Password\" required autofocus>\n{error}\n<button type=\"submit\">Sign in</button>\n</form>\n</body>\n</html>\n",
        escape_html(redirect)
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ==================== Query helpers ====================

/// An absent or empty `week` means the current week.
fn week_selector(week: Option<&str>) -> &str {
    week.filter(|w| !w.is_empty()).unwrap_or("current")
}

/// Parses `weeks`, clamping to the supported trend range.
fn parse_weeks(weeks: Option<&str>) -> Result<u32, BoardError> {
    let Some(raw) = weeks.map(str::trim).filter(|w| !w.is_empty()) else {
        return Ok(DEFAULT_TREND_WEEKS);
    };
    let weeks: i64 = raw
        .parse()
        .map_err(|_| BoardError::invalid_field("weeks", "must be a whole number"))?;
    let clamped = weeks.clamp(i64::from(MIN_TREND_WEEKS), i64::from(MAX_TREND_WEEKS));
    Ok(clamped as u32)
}
