use async_trait::async_trait;
use imagegen_server::{Error, Result, providers::ImageProvider};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

type ErrorFactory = Box<dyn Fn() -> Error + Send + Sync>;

/// Stub image provider for testing
pub struct StubProvider {
    image_url: String,
    error: Option<ErrorFactory>,
    watch_dir: Option<PathBuf>,
    delay: Option<Duration>,
    pub prompts: Mutex<Vec<String>>,
    /// Files present in `watch_dir` at each call.
    pub files_seen: Mutex<Vec<usize>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            image_url: "https://images.example.com/generated.png".to_string(),
            error: None,
            watch_dir: None,
            delay: None,
            prompts: Mutex::new(Vec::new()),
            files_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_image_url(mut self, url: &str) -> Self {
        self.image_url = url.to_string();
        self
    }

    pub fn with_error<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Error + Send + Sync + 'static,
    {
        self.error = Some(Box::new(factory));
        self
    }

    pub fn with_upstream_status(self, status: u16, code: Option<&str>) -> Self {
        let code = code.map(String::from);
        self.with_error(move || Error::Provider {
            provider: "stub".to_string(),
            status,
            code: code.clone(),
            message: format!("stub upstream failure {}", status),
        })
    }

    pub fn watching(mut self, dir: PathBuf) -> Self {
        self.watch_dir = Some(dir);
        self
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(ref dir) = self.watch_dir {
            let count = std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0);
            self.files_seen.lock().unwrap().push(count);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.error {
            Some(ref factory) => Err(factory()),
            None => Ok(self.image_url.clone()),
        }
    }
}
