//! Weekboard server binary.

use weekboard_server::{load_config, ServerConfig, WeekboardServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config file from argv[1] or WEEKBOARD_CONFIG, then env overrides
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WEEKBOARD_CONFIG").ok());
    let config = match path {
        Some(path) => load_config(&path)?,
        None => ServerConfig::default(),
    }
    .apply_env(|key| std::env::var(key).ok())?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .init();

    let server = WeekboardServer::new(config);
    server.run().await?;

    Ok(())
}
