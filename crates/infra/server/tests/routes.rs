//! Router tests: session gate, collector auth and JSON endpoints.

use axum::body::{to_bytes, Body};
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use http::{Method, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use weekboard_adapter_memory::MemoryStore;
use weekboard_core::{FixedClock, MetricField, MetricsService, SnapshotRow, TimeSlot};
use weekboard_backfill::DisabledBackfill;
use weekboard_server::{router, AppState};
use weekboard_session::SessionSigner;

const DASHBOARD_SECRET: &str = "tv-secret";
const INGEST_SECRET: &str = "collector-secret";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Wednesday 2024-03-06, 10:00 UTC (11:00 CET), ISO week 2024-W10.
fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 6, 10, 0, 0).unwrap()))
}

fn state(store: Arc<MemoryStore>) -> AppState {
    let service = MetricsService::new(store, Arc::new(DisabledBackfill)).with_clock(clock());
    AppState::new(service)
        .with_dashboard_secret(Some(DASHBOARD_SECRET))
        .unwrap()
        .with_ingest_secret(Some(INGEST_SECRET))
}

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (router(state(store.clone())), store)
}

fn session_cookie() -> String {
    let signer = SessionSigner::new(DASHBOARD_SECRET).unwrap();
    format!("dash_session={}", signer.token())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_session(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, session_cookie())
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, bearer: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header<'a>(response: &'a axum::response::Response, name: http::header::HeaderName) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

// ==================== Session gate ====================

#[tokio::test]
async fn test_login_page_is_public() {
    let (app, _) = app();
    let response = app.oneshot(get("/login?redirect=%2Fcharts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("name=\"password\""));
    assert!(html.contains("value=\"/charts\""));
}

#[tokio::test]
async fn test_api_without_session_is_401_json() {
    let (app, _) = app();
    let response = app.oneshot(get("/api/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_page_without_session_redirects_to_login() {
    let (app, _) = app();
    let response = app.oneshot(get("/charts?weeks=4")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        header(&response, LOCATION),
        "/login?redirect=%2Fcharts%3Fweeks%3D4"
    );
}

#[tokio::test]
async fn test_key_param_sets_cookie_and_keeps_tv() {
    let (app, _) = app();
    let response = app
        .oneshot(get("/?key=tv-secret&tv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(header(&response, LOCATION), "/?tv");
    let cookie = header(&response, SET_COOKIE);
    assert!(cookie.starts_with(&session_cookie()));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=2592000"));
}

#[tokio::test]
async fn test_wrong_key_redirects_to_login() {
    let (app, _) = app();
    let response = app.oneshot(get("/charts?key=guess")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(header(&response, LOCATION).starts_with("/login?redirect="));
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_without_dashboard_secret_everything_is_open() {
    let store = Arc::new(MemoryStore::new());
    let service = MetricsService::new(store, Arc::new(DisabledBackfill)).with_clock(clock());
    let app = router(AppState::new(service));

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_with_session_is_404() {
    let (app, _) = app();
    let response = app.oneshot(get_with_session("/charts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== Login ====================

fn login_form(password: &str, redirect: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "password={password}&redirect={}",
            redirect.replace('/', "%2F")
        )))
        .unwrap()
}

#[tokio::test]
async fn test_login_sets_cookie_and_redirects() {
    let (app, _) = app();
    let response = app.oneshot(login_form("tv-secret", "/charts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&response, LOCATION), "/charts");
    assert!(header(&response, SET_COOKIE).starts_with(&session_cookie()));
}

#[tokio::test]
async fn test_login_refuses_external_redirect() {
    let (app, _) = app();
    let response = app
        .oneshot(login_form("tv-secret", "//evil.example"))
        .await
        .unwrap();

    assert_eq!(header(&response, LOCATION), "/");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = app();
    let response = app.oneshot(login_form("nope", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Incorrect password"));
}

// ==================== Collector endpoints ====================

#[tokio::test]
async fn test_ingest_requires_bearer() {
    let (app, store) = app();
    let body = serde_json::json!({
        "metric_date": "2024-03-04",
        "time_slot": "08:00",
        "all_open_tickets": 40
    });

    let response = app.clone().oneshot(post_json("/api/metrics", None, body.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(post_json("/api/metrics", Some("wrong"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.row_count().await, 0);
}

#[tokio::test]
async fn test_ingest_then_read_week() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/metrics",
            Some(INGEST_SECRET),
            serde_json::json!({
                "metric_date": "2024-03-04",
                "time_slot": "08:00",
                "all_open_tickets": 40,
                "total_calls": 12
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);

    let response = app
        .clone()
        .oneshot(get_with_session("/api/metrics?week=2024-W10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["week"], "2024-03-04");
    assert_eq!(body["weekEnd"], "2024-03-11");
    assert_eq!(body["metrics"].as_array().unwrap().len(), 1);
    assert_eq!(body["metrics"][0]["all_open_tickets"], 40);

    let response = app
        .oneshot(get_with_session("/api/metrics/version"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["v"].as_str().unwrap().starts_with("2024-03-06T10:00:00"));
}

#[tokio::test]
async fn test_ingest_rejects_negative_counts_and_unknown_fields() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/metrics",
            Some(INGEST_SECRET),
            serde_json::json!({
                "metric_date": "2024-03-04",
                "time_slot": "18:00",
                "total_calls": -1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(post_json(
            "/api/metrics",
            Some(INGEST_SECRET),
            serde_json::json!({
                "metric_date": "2024-03-04",
                "time_slot": "18:00",
                "tickets": 3
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_version_is_null_when_empty() {
    let (app, _) = app();
    let response = app
        .oneshot(get_with_session("/api/metrics/version"))
        .await
        .unwrap();

    assert_eq!(json_body(response).await["v"], serde_json::Value::Null);
}

// ==================== Dashboard and trends ====================

#[tokio::test]
async fn test_dashboard_current_week() {
    let store = Arc::new(MemoryStore::with_rows([
        SnapshotRow::new(date(2024, 3, 4), TimeSlot::Latest, Utc::now())
            .with(MetricField::TotalCalls, 10),
        SnapshotRow::new(date(2024, 3, 5), TimeSlot::Latest, Utc::now())
            .with(MetricField::TotalCalls, 7),
    ]));
    let app = router(state(store));

    let response = app.oneshot(get_with_session("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["param"], "2024-W10");
    assert_eq!(body["is_current_week"], true);
    assert_eq!(body["previous_week"], "2024-W09");
    assert_eq!(body["label"], "4 - 10 mrt 2024");
    assert_eq!(body["days"].as_array().unwrap().len(), 7);
    assert_eq!(body["summary"]["totals"]["total_calls"], 17);
}

#[tokio::test]
async fn test_dashboard_invalid_week_is_400() {
    let (app, _) = app();
    let response = app
        .oneshot(get_with_session("/api/dashboard?week=2024-10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid week format"));
}

#[tokio::test]
async fn test_trends_clamps_weeks() {
    let (app, _) = app();
    let response = app
        .oneshot(get_with_session("/api/trends?weeks=50"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["span"]["start"], "2023-12-18");
    assert_eq!(body["span"]["end"], "2024-03-11");
}

#[tokio::test]
async fn test_metrics_weeks_span() {
    let (app, _) = app();
    let response = app
        .oneshot(get_with_session("/api/metrics?weeks=2"))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["week"], "2024-02-26");
    assert_eq!(body["weekEnd"], "2024-03-11");
}

// ==================== Backfill ====================

#[tokio::test]
async fn test_backfill_requires_auth() {
    let (app, _) = app();
    let response = app
        .oneshot(post_json(
            "/api/backfill",
            None,
            serde_json::json!({ "date": "2024-03-04", "time_slot": "08:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_backfill_without_webhook_is_500() {
    let (app, _) = app();
    let response = app
        .oneshot(post_json(
            "/api/backfill",
            Some(INGEST_SECRET),
            serde_json::json!({ "date": "2024-03-04", "time_slot": "08:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Backfill webhook is not configured");
}

#[tokio::test]
async fn test_backfill_with_session_rejects_latest_slot() {
    let (app, _) = app();
    let mut request = post_json(
        "/api/backfill",
        None,
        serde_json::json!({ "date": "2024-03-04", "time_slot": "latest" }),
    );
    request
        .headers_mut()
        .insert(COOKIE, session_cookie().parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
