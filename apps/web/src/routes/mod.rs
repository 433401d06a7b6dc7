pub mod health;
pub mod portfolio;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(portfolio::handle_index))
        .route(
            "/generate",
            post(portfolio::handle_generate).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
