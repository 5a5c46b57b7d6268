// Centralized error handling for the registration service

use crate::models::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Counter file failures during Pass ID allocation.
///
/// A missing counter file is not an error; it is first-run state handled
/// inside the store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read counter file: {0}")]
    Read(#[source] std::io::Error),

    #[error("Counter file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to persist counter file: {0}")]
    Write(#[source] std::io::Error),
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        // Generic message to the client, diagnostic detail for operators.
        // The detail never includes filesystem paths.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                message: "Failed to generate Pass ID".to_string(),
                error: Some(self.to_string()),
            }),
        )
            .into_response()
    }
}

/// SMTP transport failures. A single failed attempt surfaces immediately;
/// nothing is retried or queued.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Smtp(String),
}

/// Errors that can occur while processing a registration submission.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("Mobile number must be exactly 10 digits")]
    InvalidMobile,

    #[error("Unsupported image type '{declared}' for '{field}': only JPEG or PNG allowed")]
    UnsupportedMedia {
        field: &'static str,
        declared: String,
    },

    #[error("Image '{0}' exceeds the 5 MiB limit")]
    OversizedImage(&'static str),

    #[error("Invalid inline pass image data: {0}")]
    InvalidImageData(String),

    #[error("Malformed multipart request: {0}")]
    Malformed(String),

    #[error("Failed to send email")]
    Delivery(#[from] DeliveryError),
}

impl SubmissionError {
    fn status(&self) -> StatusCode {
        match self {
            SubmissionError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Validation errors name what was wrong; delivery errors carry the
        // transport detail separately for operators.
        let body = match &self {
            SubmissionError::Delivery(e) => ErrorResponse {
                message: self.to_string(),
                error: Some(e.to_string()),
            },
            _ => ErrorResponse {
                message: self.to_string(),
                error: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
