pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::ingest::handlers;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself, so a slightly oversized
/// file still reaches the pipeline and gets its descriptive error.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/import", post(handlers::handle_import))
        .route("/api/v1/import/json", post(handlers::handle_import_json))
        .route(
            "/api/v1/import/linkedin",
            post(handlers::handle_import_linkedin),
        )
        .route("/api/v1/import/apply", post(handlers::handle_apply_import))
        .route("/api/v1/export", post(handlers::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
