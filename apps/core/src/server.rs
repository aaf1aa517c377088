//! HTTP server for StudyBuddy

use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::routes;
use crate::session::{MemorySessionStore, SessionStore};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across handlers
pub struct AppState {
    pub chat: ChatService,
    pub sessions: Arc<MemorySessionStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let sessions = Arc::new(MemorySessionStore::new(
            config.session_capacity()?,
            config.session_ttl(),
        ));
        let store: Arc<dyn SessionStore> = sessions.clone();

        Ok(Self {
            chat: ChatService::new(store, config),
            sessions,
            start_time: Instant::now(),
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::session_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Periodically drops expired sessions and idle rate-limit windows.
fn spawn_sweeper(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let sessions = state.sessions.purge_expired().await;
            let windows = state.chat.prune_rate_limits().await;
            debug!(
                sessions,
                windows,
                uptime_secs = state.start_time.elapsed().as_secs(),
                "Sweep complete"
            );
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the HTTP server
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = Arc::new(AppState::new(&config)?);
    spawn_sweeper(state.clone());

    let app = build_router(state);

    let addr = config.listen_addr().await?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
