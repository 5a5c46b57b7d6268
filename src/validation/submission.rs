use crate::core::error::SubmissionError;
use crate::models::submission::{ImageUpload, RegistrationSubmission};
use base64::Engine;

/// Maximum accepted size for any single image payload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// Which optional fields a deployment variant requires.
///
/// One configurable policy replaces the forked per-variant handlers of the
/// original service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionPolicy {
    pub require_email: bool,
    pub require_pass_image: bool,
}

/// Raw multipart fields as collected by the handler, before any rule runs.
#[derive(Debug, Default)]
pub struct RawSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub city: Option<String>,
    pub business: Option<String>,
    pub pass_id: Option<String>,
    pub payment: Option<ImageUpload>,
    pub pass_image: Option<ImageUpload>,

    /// Pass image sent inline as a data URI instead of a file part.
    pub pass_image_data: Option<String>,
}

impl RawSubmission {
    /// Check every rule and produce a validated submission.
    ///
    /// The first failing rule aborts with an error naming the failure; no
    /// side effect has occurred by the time this runs.
    pub fn validate(
        self,
        policy: &SubmissionPolicy,
    ) -> Result<RegistrationSubmission, SubmissionError> {
        let name = require_text(self.name, "name")?;
        let mobile = require_text(self.mobile, "mobile")?;
        validate_mobile(&mobile)?;
        let city = require_text(self.city, "city")?;
        let business = require_text(self.business, "business")?;
        let pass_id = require_text(self.pass_id, "passId")?;

        let email = match self.email.filter(|e| !e.trim().is_empty()) {
            Some(email) => Some(email),
            None if policy.require_email => {
                return Err(SubmissionError::MissingField("email"));
            }
            None => None,
        };

        let payment = self
            .payment
            .ok_or(SubmissionError::MissingField("payment"))?;
        validate_image("payment", &payment)?;

        // The pass image arrives either as an uploaded file or as an inline
        // data URI; the uploaded form wins if both are present.
        let pass_image = match (self.pass_image, self.pass_image_data) {
            (Some(image), _) => Some(image),
            (None, Some(data)) => Some(decode_data_uri(&data, &pass_id)?),
            (None, None) if policy.require_pass_image => {
                return Err(SubmissionError::MissingField("passImage"));
            }
            (None, None) => None,
        };

        if let Some(image) = &pass_image {
            validate_image("passImage", image)?;
        }

        Ok(RegistrationSubmission {
            name,
            email,
            mobile,
            city,
            business,
            pass_id,
            payment,
            pass_image,
        })
    }
}

fn require_text(value: Option<String>, field: &'static str) -> Result<String, SubmissionError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SubmissionError::MissingField(field)),
    }
}

/// Exactly 10 ASCII digits, no leading or trailing characters.
fn validate_mobile(mobile: &str) -> Result<(), SubmissionError> {
    let bytes = mobile.as_bytes();

    if bytes.len() != 10 || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return Err(SubmissionError::InvalidMobile);
    }

    Ok(())
}

fn validate_image(field: &'static str, image: &ImageUpload) -> Result<(), SubmissionError> {
    if !is_allowed_image_type(&image.content_type) {
        return Err(SubmissionError::UnsupportedMedia {
            field,
            declared: image.content_type.clone(),
        });
    }

    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(SubmissionError::OversizedImage(field));
    }

    Ok(())
}

/// Decode a `data:image/png;base64,...` pass image into raw bytes.
fn decode_data_uri(data: &str, pass_id: &str) -> Result<ImageUpload, SubmissionError> {
    let rest = data
        .strip_prefix("data:")
        .ok_or_else(|| SubmissionError::InvalidImageData("not a data URI".to_string()))?;

    let (content_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| SubmissionError::InvalidImageData("missing base64 marker".to_string()))?;

    if !is_allowed_image_type(content_type) {
        return Err(SubmissionError::UnsupportedMedia {
            field: "passImage",
            declared: content_type.to_string(),
        });
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| SubmissionError::InvalidImageData(e.to_string()))?;

    Ok(ImageUpload {
        filename: format!("pass_{pass_id}.png"),
        content_type: content_type.to_string(),
        bytes,
    })
}
