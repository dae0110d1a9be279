use super::client::{ImageProvider, is_placeholder_secret, provider_error};
use crate::{Error, Result, config::OpenAiConfig};
use async_openai::types::{
    CreateImageRequest, CreateImageRequestArgs, Image, ImageModel, ImageQuality,
    ImageResponseFormat, ImageSize, ImageStyle, ImagesResponse,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const PROVIDER_NAME: &str = "openai";

/// Synchronous text-to-image generation against the OpenAI images endpoint.
///
/// Requests and responses use async-openai's typed image API, sent over a
/// plain reqwest client so that upstream status codes stay visible.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn build_request(prompt: &str) -> Result<CreateImageRequest> {
        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(ImageModel::DallE3)
            .n(1)
            .quality(ImageQuality::HD)
            .style(ImageStyle::Natural)
            .size(ImageSize::S1024x1792)
            .response_format(ImageResponseFormat::Url)
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if is_placeholder_secret(&self.api_key) {
            return Err(Error::config_missing(PROVIDER_NAME));
        }

        let request = Self::build_request(prompt)?;
        let url = format!("{}/images/generations", self.base_url);
        debug!("Requesting image generation from {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(PROVIDER_NAME, status.as_u16(), &body));
        }

        let images: ImagesResponse = response.json().await?;
        debug!("Image generation returned {} image(s)", images.data.len());

        images
            .data
            .iter()
            .find_map(|image| match image.as_ref() {
                Image::Url { url, .. } => Some(url.clone()),
                _ => None,
            })
            .ok_or_else(|| Error::internal("OpenAI response contained no image URL"))
    }
}
