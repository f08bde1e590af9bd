use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The plain transcript of one image, kept apart from any receipt built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecognitionResult {
    pub text: String,
    /// Caller-supplied name of the source image, or the SHA-256 hex of its bytes.
    pub source_image_ref: String,
    pub created_at: DateTime<Utc>,
}

impl TextRecognitionResult {
    pub fn new(text: impl Into<String>, source_image_ref: impl Into<String>) -> Self {
        Self::at(text, source_image_ref, Utc::now())
    }

    pub fn at(
        text: impl Into<String>,
        source_image_ref: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.into(),
            source_image_ref: source_image_ref.into(),
            created_at,
        }
    }
}
