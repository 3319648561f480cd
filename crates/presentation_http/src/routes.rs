//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard::dashboard))
        .route("/api/weather", get(handlers::weather::current_weather))
        .route(
            "/api/voice-recognition",
            get(handlers::voice::voice_recognition),
        )
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
}
