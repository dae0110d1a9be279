use super::errors::ApiError;
use super::types::{GenerationResponse, HealthResponse, InfoResponse, TransformationsResponse};
use crate::{
    Error,
    config::Config,
    generation::{Dispatcher, GenerationRequest},
    transformations::{catalog, prompt_for},
    uploads::{cleanup, receive_uploads},
};
use axum::{
    extract::{Multipart, State},
    http::{Method, Uri},
    response::Json,
};
use axum::extract::multipart::MultipartRejection;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        provider: state.dispatcher.provider_name().to_string(),
        demo_mode: state.config.demo.enabled,
        endpoints: vec![
            "GET /health",
            "GET /transformations",
            "POST /generate-image",
        ],
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

pub async fn transformations() -> Json<TransformationsResponse> {
    Json(TransformationsResponse {
        success: true,
        transformations: catalog(),
    })
}

pub async fn generate_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        debug!("Request is not a multipart form: {}", rejection);
        Error::NoImagesUploaded
    })?;

    let form = receive_uploads(multipart, &state.config.uploads).await?;
    let request = GenerationRequest::from(form);

    info!(
        "Received generation request '{}' with {} image(s)",
        request.transformation_type,
        request.uploads.len()
    );

    if state.config.demo.enabled {
        cleanup(request.uploads).await;
        info!("Demo mode: returning placeholder image");
        return Ok(Json(GenerationResponse {
            success: true,
            image_url: state.config.demo.image_url.clone(),
            prompt: prompt_for(&request.transformation_type).to_string(),
            transformation_type: request.transformation_type,
            timestamp: Utc::now(),
            provider: "demo".to_string(),
            demo: true,
            message: Some("Demo mode is enabled; no image was generated.".to_string()),
        }));
    }

    let outcome = state.dispatcher.dispatch(&request).await;
    cleanup(request.uploads).await;

    let result = outcome?;
    Ok(Json(GenerationResponse::from(result)))
}

pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(method.as_str(), uri.path())
}
