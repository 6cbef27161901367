//! `BackfillTrigger` implementations.

use async_trait::async_trait;
use tracing::warn;
use weekboard_core::{BackfillRequest, BackfillTrigger, BoardResult};

#[cfg(feature = "http-client")]
use crate::delivery::{truncate_body, BackfillDelivery, BackfillJob, DEFAULT_TIMEOUT_MS};
use crate::error::BackfillError;
#[cfg(feature = "http-client")]
use crate::error::BackfillResult;

/// Used when no webhook URL is configured; every trigger fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackfill;

#[async_trait]
impl BackfillTrigger for DisabledBackfill {
    async fn trigger(&self, request: &BackfillRequest) -> BoardResult<()> {
        warn!(date = %request.date, slot = %request.time_slot, "backfill webhook not configured");
        Err(BackfillError::NotConfigured.into())
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Posts backfill requests to the collector's webhook.
#[cfg(feature = "http-client")]
#[derive(Debug, Clone)]
pub struct HttpBackfillTrigger {
    url: String,
    timeout_ms: u64,
    client: reqwest::Client,
}

#[cfg(feature = "http-client")]
impl HttpBackfillTrigger {
    /// Creates a trigger for `url`; the URL must be absolute http(s).
    pub fn new(url: impl Into<String>) -> BackfillResult<Self> {
        let url = url.into();
        match reqwest::Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => return Err(BackfillError::InvalidUrl(url)),
        }
        Ok(Self {
            url,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            client: reqwest::Client::new(),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The webhook URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one job and records the accepted delivery.
    ///
    /// A non-2xx answer is [`BackfillError::Rejected`]; transport failures
    /// become `HttpError` or `Timeout`.
    pub async fn deliver(&self, job: &BackfillJob) -> BackfillResult<BackfillDelivery> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(&job.url)
            .json(&job.payload)
            .timeout(std::time::Duration::from_millis(job.timeout_ms))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await.ok();
        let duration_ms = start.elapsed().as_millis() as u64;

        if (200..300).contains(&status) {
            Ok(BackfillDelivery::success(job, status, body, duration_ms))
        } else {
            Err(BackfillError::Rejected {
                status,
                body: truncate_body(body.unwrap_or_default()),
            })
        }
    }
}

#[cfg(feature = "http-client")]
#[async_trait]
impl BackfillTrigger for HttpBackfillTrigger {
    async fn trigger(&self, request: &BackfillRequest) -> BoardResult<()> {
        let job = BackfillJob::new(&self.url, *request).with_timeout_ms(self.timeout_ms);
        match self.deliver(&job).await {
            Ok(delivery) => {
                tracing::debug!(
                    job = %job.id,
                    status = delivery.status_code,
                    duration_ms = delivery.duration_ms,
                    "backfill webhook accepted"
                );
                Ok(())
            }
            Err(error) => {
                warn!(job = %job.id, %error, "backfill webhook failed");
                Err(error.into())
            }
        }
    }
}
