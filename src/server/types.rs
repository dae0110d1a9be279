use crate::generation::GenerationResult;
use crate::transformations::CatalogEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub success: bool,
    pub image_url: String,
    pub prompt: String,
    pub transformation_type: String,
    pub timestamp: DateTime<Utc>,
    pub provider: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<GenerationResult> for GenerationResponse {
    fn from(result: GenerationResult) -> Self {
        Self {
            success: true,
            image_url: result.image_url,
            prompt: result.prompt,
            transformation_type: result.transformation_type,
            timestamp: result.timestamp,
            provider: result.provider,
            demo: false,
            message: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransformationsResponse {
    pub success: bool,
    pub transformations: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub provider: String,
    pub demo_mode: bool,
    pub endpoints: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorCategory,
    pub message: String,
}

/// Stable machine-readable tags carried in `ErrorEnvelope::error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    NoImagesUploaded,
    FileTooLarge,
    TooManyFiles,
    UnexpectedUploadField,
    InvalidFileType,
    MalformedUpload,
    ProviderConfigMissing,
    ProviderBadRequest,
    ProviderBillingLimit,
    ProviderInsufficientCredits,
    ProviderRateLimited,
    InternalGenerationFailure,
    NotFound,
}
