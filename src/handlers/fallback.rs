use crate::models::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// JSON 404 for unmatched routes when no static directory is configured.
pub async fn fallback_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "Not found. Valid endpoints: /generate-pass-id, /send-email, /health"
                .to_string(),
            error: None,
        }),
    )
        .into_response()
}
