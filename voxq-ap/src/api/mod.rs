//! REST API for the TTS playback service
//!
//! Handlers share one [`AppState`]: the playback controller, the speech
//! provider and the directory generated audio lands in.

pub mod handlers;
pub mod sse;

use crate::error::Error;
use crate::playback::PlaybackController;
use crate::tts::TtsProvider;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<PlaybackController>,
    pub tts: Arc<dyn TtsProvider>,
    /// Where generated and served audio files live
    pub output_dir: PathBuf,
    /// Server port, used for playback URLs when the request has no Host
    pub port: u16,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest(
            "/api",
            Router::new()
                .route("/voices", get(handlers::list_voices))
                .route("/generate-audio", post(handlers::generate_audio))
                .route("/audio/devices", get(handlers::list_audio_devices))
                .route("/audio/:filename", get(handlers::serve_audio))
                .route("/play", get(handlers::play))
                .route("/next", get(handlers::next))
                .route("/player/status", get(handlers::player_status))
                .route("/events", get(sse::event_stream)),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Handler error: wraps the crate error and picks the HTTP status
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::EmptyQueue | Error::NothingToSkip => StatusCode::CONFLICT,
            Error::InvalidInput(_) | Error::Tts(_) => StatusCode::BAD_REQUEST,
            Error::ShutDown => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;
