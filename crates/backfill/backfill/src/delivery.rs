//! Backfill job and delivery records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use weekboard_core::BackfillRequest;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Longest response body kept on a delivery record.
const MAX_BODY_LEN: usize = 512;

/// One backfill call to the collector webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillJob {
    /// Job ID.
    pub id: String,
    /// Target URL.
    pub url: String,
    /// The slot being requested.
    pub request: BackfillRequest,
    /// Payload to send.
    pub payload: Value,
    /// Timeout in milliseconds.
    pub timeout_ms: u64,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl BackfillJob {
    /// Creates a job for one missing slot.
    ///
    /// The collector expects `{"target_date": "YYYY-MM-DD", "target_time": "08:00"}`.
    pub fn new(url: impl Into<String>, request: BackfillRequest) -> Self {
        let payload = serde_json::json!({
            "target_date": request.date.format("%Y-%m-%d").to_string(),
            "target_time": request.time_slot.as_str(),
        });

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            request,
            payload,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            created_at: Utc::now(),
        }
    }

    /// Sets the timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A delivery the collector accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillDelivery {
    /// Delivery ID.
    pub id: String,
    /// Job ID.
    pub job_id: String,
    /// HTTP status code.
    pub status_code: u16,
    /// Response body (truncated).
    pub response_body: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// When the delivery was attempted.
    pub created_at: DateTime<Utc>,
}

impl BackfillDelivery {
    /// Creates a delivery record.
    pub fn success(job: &BackfillJob, status_code: u16, response_body: Option<String>, duration_ms: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_id: job.id.clone(),
            status_code,
            response_body: response_body.map(truncate_body),
            duration_ms,
            created_at: Utc::now(),
        }
    }
}

/// Cuts a response body to at most `MAX_BODY_LEN` bytes on a char boundary.
pub(crate) fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_BODY_LEN {
        let mut cut = MAX_BODY_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
