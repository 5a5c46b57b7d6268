use crate::core::error::StorageError;
use crate::core::state::AppState;
use crate::models::api::PassIdResponse;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Mint the next Pass ID.
///
/// GET /generate-pass-id
///
/// Not idempotent: every call advances the durable counter and returns a
/// new, distinct ID. A storage failure aborts without consuming an ID.
#[instrument(skip(state))]
pub async fn generate_pass_id_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, StorageError> {
    let pass_id = state.allocator.allocate().await.map_err(|e| {
        error!(error = %e, "Pass ID allocation failed");
        e
    })?;

    info!(pass_id = %pass_id, "Pass ID issued");

    Ok((
        StatusCode::OK,
        Json(PassIdResponse {
            pass_id: pass_id.to_string(),
        }),
    )
        .into_response())
}
