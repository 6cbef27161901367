//! Shared handler state.

use std::sync::Arc;
use weekboard_backfill::{DisabledBackfill, HttpBackfillTrigger};
use weekboard_core::{BackfillTrigger, BoardResult, MetricsService, MetricsStore};
use weekboard_session::{CookieOptions, SessionSigner};

use crate::config::ServerConfig;

/// State every route handler receives.
#[derive(Clone)]
pub struct AppState {
    pub service: MetricsService,
    /// Present when a dashboard secret is configured.
    pub signer: Option<SessionSigner>,
    /// Bearer secret for collector writes and backfill.
    pub ingest_secret: Option<String>,
    pub cookie: CookieOptions,
}

impl AppState {
    /// Creates an open state: no dashboard secret, no ingest secret.
    pub fn new(service: MetricsService) -> Self {
        Self {
            service,
            signer: None,
            ingest_secret: None,
            cookie: CookieOptions::default(),
        }
    }

    /// Sets the dashboard secret; an empty secret leaves the dashboard open.
    pub fn with_dashboard_secret(mut self, secret: Option<&str>) -> BoardResult<Self> {
        self.signer = match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Some(SessionSigner::new(secret)?),
            None => None,
        };
        Ok(self)
    }

    pub fn with_ingest_secret(mut self, secret: Option<&str>) -> Self {
        self.ingest_secret = secret.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn with_cookie_options(mut self, cookie: CookieOptions) -> Self {
        self.cookie = cookie;
        self
    }

    /// Wires the store and collaborators from a server config.
    pub fn from_config(config: &ServerConfig, store: Arc<dyn MetricsStore>) -> BoardResult<Self> {
        let backfill: Arc<dyn BackfillTrigger> = match config.backfill_webhook_url.as_deref() {
            Some(url) => Arc::new(
                HttpBackfillTrigger::new(url)?.with_timeout_ms(config.backfill_timeout_ms),
            ),
            None => Arc::new(DisabledBackfill),
        };
        let service = MetricsService::new(store, backfill).with_day_range(config.day_range);

        Ok(Self::new(service)
            .with_dashboard_secret(config.dashboard_secret.as_deref())?
            .with_ingest_secret(config.ingest_secret.as_deref())
            .with_cookie_options(CookieOptions::default().secure(config.secure_cookies)))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("dashboard_secret", &self.signer.is_some())
            .field("ingest_secret", &self.ingest_secret.is_some())
            .field("cookie", &self.cookie)
            .finish()
    }
}
