//! HTTP backfill trigger against a local one-shot collector.

use chrono::NaiveDate;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use weekboard_backfill::{BackfillError, BackfillJob, DisabledBackfill, HttpBackfillTrigger};
use weekboard_core::{BackfillRequest, BackfillTrigger, BoardError, TimeSlot};

fn request() -> BackfillRequest {
    BackfillRequest::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), TimeSlot::Morning)
}

/// Serves one HTTP request with `status_line` and returns the request body.
async fn one_shot_collector(status_line: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhook/backfill", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let body = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let head = text[..split].to_ascii_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                let body = &text[split + 4..];
                if body.len() >= len {
                    break body.to_string();
                }
            }
            if n == 0 {
                break String::new();
            }
        };
        let response = format!("{status_line}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok");
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        body
    });

    (url, handle)
}

#[tokio::test]
async fn test_trigger_posts_target_date_and_time() {
    let (url, handle) = one_shot_collector("HTTP/1.1 200 OK").await;
    let trigger = HttpBackfillTrigger::new(url).unwrap();

    trigger.trigger(&request()).await.unwrap();

    let body: serde_json::Value = serde_json::from_str(&handle.await.unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "target_date": "2024-03-04", "target_time": "08:00" })
    );
}

#[tokio::test]
async fn test_non_2xx_is_backfill_failed() {
    let (url, handle) = one_shot_collector("HTTP/1.1 500 Internal Server Error").await;
    let trigger = HttpBackfillTrigger::new(url).unwrap();

    let err = trigger.trigger(&request()).await.unwrap_err();
    assert!(matches!(err, BoardError::BackfillFailed { .. }));
    assert!(err.to_string().contains("HTTP 500"));
    handle.await.unwrap();
}

#[tokio::test]
async fn test_deliver_reports_rejection_with_status_and_body() {
    let (url, handle) = one_shot_collector("HTTP/1.1 503 Service Unavailable").await;
    let trigger = HttpBackfillTrigger::new(url.clone()).unwrap();
    let job = BackfillJob::new(url, request());

    match trigger.deliver(&job).await {
        Err(BackfillError::Rejected { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "ok");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    handle.await.unwrap();
}

#[tokio::test]
async fn test_deliver_records_accepted_job() {
    let (url, handle) = one_shot_collector("HTTP/1.1 202 Accepted").await;
    let trigger = HttpBackfillTrigger::new(url.clone()).unwrap();
    let job = BackfillJob::new(url, request());

    let delivery = trigger.deliver(&job).await.unwrap();
    assert_eq!(delivery.job_id, job.id);
    assert_eq!(delivery.status_code, 202);
    assert_eq!(delivery.response_body.as_deref(), Some("ok"));
    handle.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_collector_is_backfill_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/hook", listener.local_addr().unwrap());
    drop(listener);

    let trigger = HttpBackfillTrigger::new(url).unwrap().with_timeout_ms(2_000);
    let err = trigger.trigger(&request()).await.unwrap_err();
    assert!(matches!(err, BoardError::BackfillFailed { .. }));
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    assert!(matches!(
        HttpBackfillTrigger::new("not a url"),
        Err(BackfillError::InvalidUrl(_))
    ));
    assert!(matches!(
        HttpBackfillTrigger::new("ftp://example.com/x"),
        Err(BackfillError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn test_disabled_backfill() {
    let trigger = DisabledBackfill;
    assert!(!trigger.is_configured());
    let err = trigger.trigger(&request()).await.unwrap_err();
    assert!(matches!(err, BoardError::BackfillNotConfigured));
}
