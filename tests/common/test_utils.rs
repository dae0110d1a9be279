use super::mocks::StubProvider;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use imagegen_server::{
    config::{
        Config, DemoConfig, LogsConfig, OpenAiConfig, ProviderConfig, ProviderKind,
        ReplicateConfig, ServerConfig, UploadConfig,
    },
    generation::Dispatcher,
    providers::ImageProvider,
    server::{AppState, router},
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Per-file limit used by HTTP tests so oversized bodies stay small.
pub const TEST_MAX_FILE_SIZE: u64 = 1024;

pub const DEMO_IMAGE_URL: &str = "https://example.com/demo-placeholder.jpg";

/// Minimal JPEG header followed by filler bytes.
pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    bytes.resize(len.max(bytes.len()), 0xAB);
    bytes
}

/// Create a test configuration with uploads under `upload_dir`
pub fn create_test_config(upload_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
            cors_origins: Vec::new(),
        },
        uploads: UploadConfig {
            dir: upload_dir.to_path_buf(),
            max_file_size: TEST_MAX_FILE_SIZE,
            max_files: 2,
        },
        provider: ProviderConfig {
            kind: ProviderKind::Openai,
            openai: OpenAiConfig {
                api_key: "sk-test".to_string(),
                base_url: "http://127.0.0.1:9/v1".to_string(),
                timeout_secs: 5,
            },
            replicate: ReplicateConfig::default(),
        },
        demo: DemoConfig {
            enabled: false,
            image_url: DEMO_IMAGE_URL.to_string(),
        },
    }
}

pub fn create_app(config: Config, provider: Arc<dyn ImageProvider>) -> Router {
    router(AppState {
        config: Arc::new(config),
        dispatcher: Arc::new(Dispatcher::new(provider)),
    })
}

/// App backed by `provider`, storing uploads in a fresh temp dir.
pub fn create_test_app(provider: Arc<StubProvider>) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(temp_dir.path());
    (create_app(config, provider), temp_dir)
}

pub fn create_demo_app(provider: Arc<StubProvider>) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config(temp_dir.path());
    config.demo.enabled = true;
    (create_app(config, provider), temp_dir)
}

/// Hand-built multipart/form-data body.
pub struct MultipartBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self {
            boundary: "----imagegen-test-boundary-7MA4YWxkTrZu0gW".to_string(),
            body: Vec::new(),
        }
    }

    pub fn file(
        mut self,
        field: &str,
        filename: Option<&str>,
        content_type: &str,
        data: &[u8],
    ) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        let disposition = match filename {
            Some(name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
        };
        self.body.extend_from_slice(disposition.as_bytes());
        self.body
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn jpeg(self, filename: &str) -> Self {
        self.file("images", Some(filename), "image/jpeg", &jpeg_bytes(64))
    }

    pub fn text(mut self, field: &str, value: &str) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                field, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn build(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }

    pub fn into_request(self) -> Request<Body> {
        let (content_type, body) = self.build();
        Request::builder()
            .method("POST")
            .uri("/generate-image")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap()
    }
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Number of entries currently in `dir`.
pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
