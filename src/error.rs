use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No images uploaded")]
    NoImagesUploaded,

    #[error("File too large: limit is {max_bytes} bytes")]
    FileTooLarge { max_bytes: u64 },

    #[error("Too many files: limit is {max_files}")]
    TooManyFiles { max_files: usize },

    #[error("Unexpected upload field: {field}")]
    UnexpectedUploadField { field: String },

    #[error("Invalid file type: {filename}")]
    InvalidFileType { filename: String },

    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    #[error("Provider {provider} is missing credentials")]
    ProviderConfigMissing { provider: String },

    #[error("Provider {provider} returned {status}: {message}")]
    Provider {
        provider: String,
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Provider {provider} did not finish within {waited_secs}s")]
    ProviderTimeout { provider: String, waited_secs: u64 },

    #[error("Prediction {id} failed: {reason}")]
    PredictionFailed { id: String, reason: String },

    #[error("Invalid prediction transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn malformed_upload(msg: impl Into<String>) -> Self {
        Self::MalformedUpload(msg.into())
    }

    pub fn config_missing(provider: impl Into<String>) -> Self {
        Self::ProviderConfigMissing {
            provider: provider.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
