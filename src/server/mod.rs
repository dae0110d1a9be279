mod errors;
pub mod handlers;
mod types;

pub use errors::ApiError;
pub use handlers::AppState;
pub use types::*;

use crate::{
    Result,
    config::{Config, UploadConfig},
    generation::Dispatcher,
    providers::create_provider,
    uploads::ensure_upload_dir,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub async fn run(config: Config) -> Result<()> {
    ensure_upload_dir(&config.uploads.dir).await?;

    let provider = create_provider(&config.provider)?;
    info!(
        "Using image provider: {} (demo mode: {})",
        provider.name(),
        config.demo.enabled
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let app_state = AppState {
        config: Arc::new(config),
        dispatcher: Arc::new(Dispatcher::new(provider)),
    };
    let app = router(app_state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the full HTTP surface around `state`.
pub fn router(state: AppState) -> Router {
    let body_limit = body_limit(&state.config.uploads);
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(handlers::info))
        .route("/health", get(handlers::health))
        .route("/transformations", get(handlers::transformations))
        .route("/generate-image", post(handlers::generate_image))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn body_limit(uploads: &UploadConfig) -> usize {
    let limit = (uploads.max_files as u64 + 1)
        .saturating_mul(uploads.max_file_size)
        .saturating_add(MULTIPART_OVERHEAD);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
