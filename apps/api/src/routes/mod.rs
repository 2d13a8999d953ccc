pub mod credential;
pub mod health;
pub mod origin;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    let allowed_origin = state.config.cors_allowed_origin.clone();

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analyze",
            post(handlers::handle_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/analysis", get(handlers::handle_get_analysis))
        .route(
            "/api/v1/analysis/resume",
            get(handlers::handle_download_resume),
        )
        .route(
            "/api/v1/analysis/cover-letter",
            get(handlers::handle_download_cover_letter),
        )
        // Credential API
        .route(
            "/api/v1/credential",
            get(credential::handle_get_credential)
                .put(credential::handle_set_credential)
                .delete(credential::handle_clear_credential),
        )
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            allowed_origin.clone(),
            origin::reject_foreign_origin,
        ))
        .layer(origin::cors_layer(allowed_origin))
}
