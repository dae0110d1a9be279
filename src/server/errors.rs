use super::types::{ErrorCategory, ErrorEnvelope};
use crate::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

/// Upstream code meaning the account hit its spending cap.
const BILLING_HARD_LIMIT_CODE: &str = "billing_hard_limit_reached";

/// HTTP-facing failure: a status plus the normalized error envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub envelope: ErrorEnvelope,
}

impl ApiError {
    pub fn new(status: StatusCode, category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: ErrorEnvelope {
                success: false,
                error: category,
                message: message.into(),
            },
        }
    }

    pub fn not_found(method: &str, path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorCategory::NotFound,
            format!("Route {} {} not found", method, path),
        )
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        use ErrorCategory::*;

        match err {
            Error::NoImagesUploaded => Self::new(
                StatusCode::BAD_REQUEST,
                NoImagesUploaded,
                "No images uploaded. Please upload at least one image.",
            ),
            Error::FileTooLarge { max_bytes } => Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                FileTooLarge,
                format!("File too large. Maximum size is {}.", human_size(max_bytes)),
            ),
            Error::TooManyFiles { max_files } => Self::new(
                StatusCode::BAD_REQUEST,
                TooManyFiles,
                format!("Too many files. Maximum is {} images.", max_files),
            ),
            Error::UnexpectedUploadField { field } => Self::new(
                StatusCode::BAD_REQUEST,
                UnexpectedUploadField,
                format!("Unexpected file field '{}'. Use the 'images' field.", field),
            ),
            Error::InvalidFileType { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                InvalidFileType,
                "Only image files are allowed.",
            ),
            Error::MalformedUpload(detail) => {
                warn!("Malformed upload: {}", detail);
                Self::new(
                    StatusCode::BAD_REQUEST,
                    MalformedUpload,
                    "The upload could not be read as a multipart form.",
                )
            }
            Error::ProviderConfigMissing { provider } => {
                error!("Image provider '{}' has no credentials configured", provider);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProviderConfigMissing,
                    "The image generation service is not configured.",
                )
            }
            Error::Provider {
                provider,
                status,
                code,
                message,
            } => match status {
                400 if code.as_deref() == Some(BILLING_HARD_LIMIT_CODE) => {
                    error!("{} billing hard limit reached: {}", provider, message);
                    Self::new(
                        StatusCode::PAYMENT_REQUIRED,
                        ProviderBillingLimit,
                        "The image generation service needs to be topped up. Please try again later.",
                    )
                }
                400 => {
                    warn!("{} rejected the request: {}", provider, message);
                    Self::new(
                        StatusCode::BAD_REQUEST,
                        ProviderBadRequest,
                        "The image generation service rejected the request.",
                    )
                }
                402 => {
                    error!("{} reports insufficient credits: {}", provider, message);
                    Self::new(
                        StatusCode::PAYMENT_REQUIRED,
                        ProviderInsufficientCredits,
                        "Insufficient credits on the image generation service.",
                    )
                }
                429 => {
                    warn!("{} rate limit hit: {}", provider, message);
                    Self::new(
                        StatusCode::TOO_MANY_REQUESTS,
                        ProviderRateLimited,
                        "Rate limit exceeded. Please wait a moment and try again.",
                    )
                }
                _ => {
                    error!("{} failed with {}: {}", provider, status, message);
                    generation_failed()
                }
            },
            other => {
                error!("Image generation failed: {}", other);
                generation_failed()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

fn generation_failed() -> ApiError {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCategory::InternalGenerationFailure,
        "Failed to generate image. Please try again.",
    )
}

fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const KIB: u64 = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}
