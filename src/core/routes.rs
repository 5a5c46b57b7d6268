// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

// Two 5 MiB images plus text fields and multipart framing
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route(
            "/generate-pass-id",
            get(crate::handlers::pass_id::generate_pass_id_handler),
        )
        .route(
            "/send-email",
            post(crate::handlers::submission::send_email_handler),
        )
        .route("/health", get(crate::handlers::health::health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    // Landing page assets when configured, JSON 404 otherwise
    let router = match &state.config.server.static_dir {
        Some(static_dir) => router.fallback_service(ServeDir::new(static_dir)),
        None => router.fallback(crate::handlers::fallback::fallback_handler),
    };

    router.with_state(state)
}
