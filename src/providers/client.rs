use super::{OpenAiProvider, ReplicateProvider};
use crate::{Error, Result, config::{ProviderConfig, ProviderKind}};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A remote text-to-image service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Name reported back to callers in the success envelope.
    fn name(&self) -> &'static str;

    /// Generates one image for `prompt` and returns its URL.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn ImageProvider>> {
    let provider: Arc<dyn ImageProvider> = match config.kind {
        ProviderKind::Openai => Arc::new(OpenAiProvider::new(config.openai.clone())?),
        ProviderKind::Replicate => Arc::new(ReplicateProvider::new(config.replicate.clone())),
    };
    Ok(provider)
}

/// Empty credentials and `your_...` template values count as missing.
pub(crate) fn is_placeholder_secret(secret: &str) -> bool {
    let secret = secret.trim();
    secret.is_empty() || secret.starts_with("your_") || secret.starts_with("<")
}

/// Builds `Error::Provider` from a non-2xx upstream response body.
///
/// Understands the OpenAI shape (`{"error": {"message", "code", "type"}}`) and
/// the Replicate problem-details shape (`{"detail", "title"}`), falling back to
/// the raw body text.
pub(crate) fn provider_error(provider: &str, status: u16, body: &str) -> Error {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let (code, message) = match parsed {
        Some(value) => {
            if let Some(err) = value.get("error").filter(|e| e.is_object()) {
                let code = err
                    .get("code")
                    .and_then(Value::as_str)
                    .or_else(|| err.get("type").and_then(Value::as_str))
                    .map(String::from);
                let message = err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or(body)
                    .to_string();
                (code, message)
            } else {
                let code = value
                    .get("code")
                    .and_then(Value::as_str)
                    .map(String::from);
                let message = value
                    .get("detail")
                    .or_else(|| value.get("error"))
                    .or_else(|| value.get("title"))
                    .and_then(Value::as_str)
                    .unwrap_or(body)
                    .to_string();
                (code, message)
            }
        }
        None => (None, body.to_string()),
    };

    Error::Provider {
        provider: provider.to_string(),
        status,
        code,
        message,
    }
}
