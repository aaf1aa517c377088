//! HTTP routes for the chat API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::chat::new_session_id;
use crate::error::AppError;
use crate::models::{HealthResponse, SessionCreated, SubmitRequest, TranscriptResponse};
use crate::server::AppState;
use crate::session::{SessionStore, Transcript};

type AppStateArc = Arc<AppState>;

fn transcript_response(session_id: String, transcript: Transcript) -> Json<TranscriptResponse> {
    Json(TranscriptResponse {
        session_id,
        entries: transcript.into_entries(),
    })
}

// ============================================================================
// Session Routes
// ============================================================================

pub fn session_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:session_id/messages",
            get(get_transcript).post(submit_message),
        )
        .route("/api/sessions/:session_id/reset", post(reset_session))
}

async fn create_session() -> (StatusCode, Json<SessionCreated>) {
    let session_id = new_session_id();
    info!(%session_id, "Session created");
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn get_transcript(
    State(state): State<AppStateArc>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let transcript = state.chat.transcript(&session_id).await?;
    Ok(transcript_response(session_id, transcript))
}

async fn submit_message(
    State(state): State<AppStateArc>,
    Path(session_id): Path<String>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let Json(req) = body?;
    req.validate()?;
    let transcript = state.chat.submit(&session_id, &req.message).await?;
    Ok(transcript_response(session_id, transcript))
}

async fn reset_session(
    State(state): State<AppStateArc>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let transcript = state.chat.reset(&session_id).await?;
    Ok(transcript_response(session_id, transcript))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions.session_count().await,
    })
}
