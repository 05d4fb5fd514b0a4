pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screenings", post(handlers::handle_screening))
        .route(
            "/api/v1/screenings/export",
            post(handlers::handle_screening_export),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
