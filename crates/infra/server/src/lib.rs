//! # Weekboard Server
//!
//! The HTTP surface of the weekly metrics dashboard: JSON endpoints for the
//! week table, trend charts and raw rows, the collector's ingest and
//! backfill endpoints, and a shared-secret login that gates everything else.

mod config;
mod error;
mod extract;
mod layer;
mod routes;
mod state;

pub use config::{load_config, ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use extract::{BackfillAuth, CollectorAuth};
pub use layer::{SessionLayer, SessionMiddleware};
pub use routes::{routes, DEFAULT_TREND_WEEKS};
pub use state::AppState;

use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};
use weekboard_adapter_memory::MemoryStore;
use weekboard_core::{BoardResult, MetricsStore};

/// Builds the application: every route behind the session gate.
pub fn router(state: AppState) -> Router {
    let gate = SessionLayer::new(state.signer.clone(), state.cookie);
    routes().with_state(state).layer(gate)
}

/// The dashboard server.
pub struct WeekboardServer {
    /// Server configuration.
    pub config: ServerConfig,
    store: Arc<dyn MetricsStore>,
}

impl WeekboardServer {
    /// Creates a server backed by an in-memory store.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Replaces the metrics store.
    pub fn with_store(mut self, store: Arc<dyn MetricsStore>) -> Self {
        self.store = store;
        self
    }

    /// Builds the router for the current configuration.
    pub fn router(&self) -> BoardResult<Router> {
        let state = AppState::from_config(&self.config, self.store.clone())?;
        Ok(router(state))
    }

    /// Starts the server.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router()?;
        let address = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&address).await?;

        info!(%address, "Starting Weekboard server");
        if self.config.dashboard_secret.is_none() {
            warn!("DASHBOARD_SECRET not set, dashboard is open");
        }
        if self.config.ingest_secret.is_none() {
            warn!("no ingest secret configured, collector writes will be refused");
        }
        if self.config.backfill_webhook_url.is_none() {
            info!("no backfill webhook configured");
        }

        axum::serve(listener, app).await?;
        Ok(())
    }
}

impl Default for WeekboardServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
