use super::client::{ImageProvider, is_placeholder_secret, provider_error};
use super::prediction::{PredictionStatus, PredictionTracker};
use crate::{Error, Result, config::ReplicateConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const PROVIDER_NAME: &str = "replicate";

const CANCEL_TIMEOUT: Duration = Duration::from_secs(10);

// Known client-side defect where the output arrives as an unread stream object.
const STREAM_DEFECT_SIGNATURE: &str = "ReadableStream";

const IMAGE_WIDTH: u32 = 768;
const IMAGE_HEIGHT: u32 = 1024;
const NUM_INFERENCE_STEPS: u32 = 50;
const GUIDANCE_SCALE: f32 = 7.5;
const REFINER: &str = "expert_ensemble_refiner";
const HIGH_NOISE_FRAC: f32 = 0.8;

#[derive(Debug, Serialize)]
struct CreatePrediction<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
    num_outputs: u32,
    num_inference_steps: u32,
    guidance_scale: f32,
    refine: &'a str,
    high_noise_frac: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Asynchronous generation through the Replicate predictions API.
///
/// A prediction is submitted, then polled until it reaches a terminal status.
/// Submission and polling together are bounded by `max_wait_secs`; when the
/// bound is hit after submission the prediction is cancelled upstream.
pub struct ReplicateProvider {
    client: reqwest::Client,
    config: ReplicateConfig,
}

impl ReplicateProvider {
    pub fn new(mut config: ReplicateConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn create_prediction(&self, prompt: &str) -> Result<Prediction> {
        let body = CreatePrediction {
            version: &self.config.model_version,
            input: PredictionInput {
                prompt,
                width: IMAGE_WIDTH,
                height: IMAGE_HEIGHT,
                num_outputs: 1,
                num_inference_steps: NUM_INFERENCE_STEPS,
                guidance_scale: GUIDANCE_SCALE,
                refine: REFINER,
                high_noise_frac: HIGH_NOISE_FRAC,
            },
        };

        let response = self
            .client
            .post(format!("{}/predictions", self.config.base_url))
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await?;

        let prediction = Self::read_prediction(response).await?;
        info!(
            "Submitted prediction {} ({:?})",
            prediction.id, prediction.status
        );
        Ok(prediction)
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction> {
        let response = self
            .client
            .get(format!("{}/predictions/{}", self.config.base_url, id))
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        Self::read_prediction(response).await
    }

    async fn cancel_prediction(&self, id: &str) {
        let result = self
            .client
            .post(format!("{}/predictions/{}/cancel", self.config.base_url, id))
            .bearer_auth(&self.config.api_token)
            .timeout(CANCEL_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("Cancelled prediction {}", id)
            }
            Ok(response) => warn!(
                "Cancelling prediction {} returned {}",
                id,
                response.status()
            ),
            Err(e) => warn!("Failed to cancel prediction {}: {}", id, e),
        }
    }

    async fn read_prediction(response: reqwest::Response) -> Result<Prediction> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(PROVIDER_NAME, status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }

    async fn wait_for_completion(&self, prediction: Prediction) -> Result<Prediction> {
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let mut tracker = PredictionTracker::new(prediction.id.clone(), prediction.status);
        let mut current = prediction;

        while !tracker.is_terminal() {
            tokio::time::sleep(poll_interval).await;
            current = self.get_prediction(tracker.id()).await?;
            debug!("Prediction {} is {:?}", current.id, current.status);
            tracker.observe(current.status)?;
        }

        Ok(current)
    }

    async fn submit_and_wait(
        &self,
        prompt: &str,
        submitted: &mut Option<String>,
    ) -> Result<Prediction> {
        let prediction = self.create_prediction(prompt).await?;
        *submitted = Some(prediction.id.clone());
        self.wait_for_completion(prediction).await
    }

    async fn run(&self, prompt: &str) -> Result<String> {
        let max_wait = Duration::from_secs(self.config.max_wait_secs);
        let mut submitted = None;
        let outcome =
            tokio::time::timeout(max_wait, self.submit_and_wait(prompt, &mut submitted)).await;

        let finished = match outcome {
            Ok(result) => result?,
            Err(_) => {
                match submitted.as_deref() {
                    Some(id) => {
                        warn!(
                            "Prediction {} still running after {}s, giving up",
                            id, self.config.max_wait_secs
                        );
                        self.cancel_prediction(id).await;
                    }
                    None => warn!(
                        "Replicate did not accept the prediction within {}s",
                        self.config.max_wait_secs
                    ),
                }
                return Err(Error::ProviderTimeout {
                    provider: PROVIDER_NAME.to_string(),
                    waited_secs: self.config.max_wait_secs,
                });
            }
        };
        let id = finished.id.clone();

        match finished.status {
            PredictionStatus::Succeeded => first_output_url(&finished),
            PredictionStatus::Failed => Err(Error::PredictionFailed {
                id,
                reason: finished
                    .error
                    .as_ref()
                    .map(describe)
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
            PredictionStatus::Canceled => Err(Error::PredictionFailed {
                id,
                reason: "prediction was canceled".to_string(),
            }),
            other => Err(Error::internal(format!(
                "Prediction {} stopped in non-terminal state {:?}",
                id, other
            ))),
        }
    }
}

#[async_trait]
impl ImageProvider for ReplicateProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if is_placeholder_secret(&self.config.api_token) {
            return Err(Error::config_missing(PROVIDER_NAME));
        }

        match self.run(prompt).await {
            Err(e) if is_stream_defect(&e) => {
                warn!(
                    "Replicate stream defect ({}), substituting fallback image",
                    e
                );
                Ok(self.config.fallback_image_url.clone())
            }
            other => other,
        }
    }
}

fn first_output_url(prediction: &Prediction) -> Result<String> {
    let url = match &prediction.output {
        Some(Value::String(url)) => Some(url.clone()),
        Some(Value::Array(items)) => items.first().and_then(Value::as_str).map(String::from),
        _ => None,
    };

    url.ok_or_else(|| {
        Error::internal(format!(
            "Prediction {} produced no image URL: {}",
            prediction.id,
            prediction
                .output
                .as_ref()
                .map(describe)
                .unwrap_or_else(|| "null".to_string())
        ))
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_stream_defect(error: &Error) -> bool {
    error.to_string().contains(STREAM_DEFECT_SIGNATURE)
}
