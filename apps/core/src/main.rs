// StudyBuddy Backend Entry Point
// Rule-based study assistant served over HTTP

mod brain;
mod chat;
mod config;
mod error;
mod models;
mod rate_limiter;
mod routes;
mod server;
mod session;
mod telemetry;

#[cfg(test)]
mod tests;

use config::AppConfig;
use telemetry::LogFormat;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be read before the logger so RUST_LOG from the file applies
    let dotenv_path = dotenv::dotenv().ok();
    telemetry::init(LogFormat::from_env())?;
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {:?}", path);
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting StudyBuddy v{} (sessions: max {}, ttl {}s)",
        env!("CARGO_PKG_VERSION"),
        config.max_sessions,
        config.session_ttl_secs
    );

    server::run(config).await?;
    info!("StudyBuddy stopped");
    Ok(())
}
