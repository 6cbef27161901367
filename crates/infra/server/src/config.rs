//! Server configuration.

use serde::{Deserialize, Serialize};
use weekboard_backfill::DEFAULT_TIMEOUT_MS;
use weekboard_core::{BoardError, DayRange};

/// Server-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Dashboard password; also keys the session token. Unset leaves the
    /// dashboard open.
    pub dashboard_secret: Option<String>,
    /// Bearer secret the collector uses for writes.
    pub ingest_secret: Option<String>,
    /// Collector webhook that fills missing slots.
    pub backfill_webhook_url: Option<String>,
    pub backfill_timeout_ms: u64,
    /// Marks the session cookie `Secure`.
    pub secure_cookies: bool,
    pub day_range: DayRange,
    /// Log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            dashboard_secret: None,
            ingest_secret: None,
            backfill_webhook_url: None,
            backfill_timeout_ms: DEFAULT_TIMEOUT_MS,
            secure_cookies: false,
            day_range: DayRange::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Parses the `[server]` table of a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: toml::Value =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let server = config
            .get("server")
            .map(|v| toml::Value::try_into(v.clone()))
            .transpose()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?
            .unwrap_or_default();

        Ok(server)
    }

    /// Overrides values from environment variables read through `lookup`.
    ///
    /// Empty variables count as unset.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |keys: &[&str]| {
            keys.iter()
                .filter_map(|&key| lookup(key))
                .find(|value| !value.is_empty())
        };

        if let Some(secret) = var(&["DASHBOARD_SECRET"]) {
            self.dashboard_secret = Some(secret);
        }
        if let Some(secret) = var(&["INGEST_SECRET", "N8N_WEBHOOK_SECRET"]) {
            self.ingest_secret = Some(secret);
        }
        if let Some(url) = var(&["BACKFILL_WEBHOOK_URL", "N8N_BACKFILL_WEBHOOK_URL"]) {
            self.backfill_webhook_url = Some(url);
        }
        if let Some(port) = var(&["WEEKBOARD_PORT"]) {
            self.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "WEEKBOARD_PORT".to_string(),
                value: port,
            })?;
        }
        if let Some(level) = var(&["WEEKBOARD_LOG"]) {
            self.log_level = level;
        }

        Ok(self)
    }

    /// The configured maximum log level.
    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "log_level".to_string(),
                value: self.log_level.clone(),
            })
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads configuration from a TOML file.
pub fn load_config(path: &str) -> Result<ServerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    ServerConfig::from_toml_str(&content)
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<ConfigError> for BoardError {
    fn from(err: ConfigError) -> Self {
        BoardError::config(err.to_string())
    }
}
