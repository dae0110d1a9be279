use crate::transformations::DEFAULT_TRANSFORMATION;
use crate::uploads::{TempUploads, UploadForm};
use chrono::{DateTime, Utc};

/// One `POST /generate-image` call after intake.
#[derive(Debug)]
pub struct GenerationRequest {
    /// Identifier as sent by the client; may be outside the known set.
    pub transformation_type: String,
    pub uploads: TempUploads,
}

impl From<UploadForm> for GenerationRequest {
    fn from(form: UploadForm) -> Self {
        Self {
            transformation_type: form
                .transformation_type
                .unwrap_or_else(|| DEFAULT_TRANSFORMATION.to_string()),
            uploads: form.files,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub image_url: String,
    pub prompt: String,
    pub transformation_type: String,
    pub timestamp: DateTime<Utc>,
    pub provider: String,
}
