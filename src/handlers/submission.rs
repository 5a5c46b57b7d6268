use crate::core::error::SubmissionError;
use crate::core::state::AppState;
use crate::mailer::composer;
use crate::models::api::SendEmailResponse;
use crate::models::submission::ImageUpload;
use crate::validation::submission::{
    is_allowed_image_type, RawSubmission, SubmissionPolicy, MAX_IMAGE_BYTES,
};
use axum::{
    extract::multipart::{Field, Multipart},
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Registration submission handler.
///
/// POST /send-email (multipart form)
///
/// # Flow
/// 1. Collect multipart text fields and image parts
/// 2. Validate against the configured submission policy
/// 3. Compose the admin message (and registrant copy when configured)
/// 4. Dispatch sequentially through the mail transport
///
/// Validation failure responds 400 with no email sent; dispatch failure
/// responds 500 and the registration is not retried or queued.
#[instrument(skip(state, multipart))]
pub async fn send_email_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, SubmissionError> {
    let raw = collect_fields(&mut multipart).await?;

    let policy = SubmissionPolicy {
        require_email: state.config.registration.require_email,
        require_pass_image: state.config.registration.require_pass_image,
    };

    let submission = raw.validate(&policy).map_err(|e| {
        warn!(error = %e, "Submission rejected");
        e
    })?;

    let messages = composer::compose(&submission, &state.config.registration);

    state.dispatcher.dispatch(&messages).await.map_err(|e| {
        error!(error = %e, pass_id = %submission.pass_id, "Email dispatch failed");
        e
    })?;

    info!(
        pass_id = %submission.pass_id,
        recipients = messages.len(),
        "Registration dispatched"
    );

    Ok((
        StatusCode::OK,
        Json(SendEmailResponse {
            message: "Email sent successfully".to_string(),
            pass_id: submission.pass_id,
        }),
    )
        .into_response())
}

async fn collect_fields(multipart: &mut Multipart) -> Result<RawSubmission, SubmissionError> {
    let mut raw = RawSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SubmissionError::Malformed(e.to_string()))?
    {
        match field.name() {
            Some("name") => raw.name = Some(read_text(field).await?),
            Some("email") => raw.email = Some(read_text(field).await?),
            Some("mobile") => raw.mobile = Some(read_text(field).await?),
            Some("city") => raw.city = Some(read_text(field).await?),
            Some("business") => raw.business = Some(read_text(field).await?),
            Some("passId") => raw.pass_id = Some(read_text(field).await?),
            Some("payment") => raw.payment = Some(read_image(field, "payment").await?),
            Some("passImage") => {
                // The pass image arrives either as a file part or as an
                // inline data URI, depending on the calling page
                if field.content_type().is_some() {
                    raw.pass_image = Some(read_image(field, "passImage").await?);
                } else {
                    raw.pass_image_data = Some(read_text(field).await?);
                }
            }
            _ => {}
        }
    }

    Ok(raw)
}

async fn read_text(field: Field<'_>) -> Result<String, SubmissionError> {
    field
        .text()
        .await
        .map_err(|e| SubmissionError::Malformed(e.to_string()))
}

/// Read an image part into memory.
///
/// A wrong declared type is rejected before any of the body is buffered;
/// an oversized payload is rejected as soon as the cap is crossed rather
/// than after full buffering.
async fn read_image(
    mut field: Field<'_>,
    name: &'static str,
) -> Result<ImageUpload, SubmissionError> {
    let content_type = field
        .content_type()
        .map(str::to_owned)
        .ok_or(SubmissionError::MissingField(name))?;

    if !is_allowed_image_type(&content_type) {
        return Err(SubmissionError::UnsupportedMedia {
            field: name,
            declared: content_type,
        });
    }

    let filename = field
        .file_name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{name}.png"));

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| SubmissionError::Malformed(e.to_string()))?
    {
        if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(SubmissionError::OversizedImage(name));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(ImageUpload {
        filename,
        content_type,
        bytes,
    })
}
