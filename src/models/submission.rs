/// An image payload held fully in memory for the duration of a request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename as declared by the client.
    pub filename: String,

    /// Declared MIME type ("image/jpeg" or "image/png" after validation).
    pub content_type: String,

    pub bytes: Vec<u8>,
}

/// A fully validated registration, ready for composition.
///
/// Built exclusively by the submission validator; never persisted.
#[derive(Debug, Clone)]
pub struct RegistrationSubmission {
    pub name: String,

    /// Present when supplied; guaranteed present when the policy requires it.
    pub email: Option<String>,

    /// Exactly 10 ASCII digits.
    pub mobile: String,

    pub city: String,

    pub business: String,

    /// Pass ID obtained from a prior allocation call.
    pub pass_id: String,

    /// Payment screenshot, always present.
    pub payment: ImageUpload,

    /// Generated pass image, uploaded or decoded from an inline data URI.
    pub pass_image: Option<ImageUpload>,
}
