use super::{GenerationRequest, GenerationResult};
use crate::{Result, providers::ImageProvider, transformations::prompt_for};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Turns a generation request into a single provider call.
pub struct Dispatcher {
    provider: Arc<dyn ImageProvider>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn dispatch(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let prompt = prompt_for(&request.transformation_type);

        // Providers are prompt-only; upload contents are not sent upstream.
        debug!(
            "Dispatching '{}' with {} upload(s) to {}",
            request.transformation_type,
            request.uploads.len(),
            self.provider.name()
        );

        let image_url = self.provider.generate(prompt).await?;

        info!(
            "Generated image for '{}' via {}",
            request.transformation_type,
            self.provider.name()
        );

        Ok(GenerationResult {
            image_url,
            prompt: prompt.to_string(),
            transformation_type: request.transformation_type.clone(),
            timestamp: Utc::now(),
            provider: self.provider.name().to_string(),
        })
    }
}
