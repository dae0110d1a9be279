mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Loads the YAML config (if present) and layers environment overrides on top.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let config = if Path::new(&config_path).exists() {
        debug!("Loading configuration from: {}", config_path);
        let config_str = tokio::fs::read_to_string(&config_path).await?;
        serde_yaml::from_str(&config_str)?
    } else {
        debug!("No configuration file at {}, using defaults", config_path);
        Config::default()
    };

    apply_overrides(config, |key| env::var(key).ok())
}

/// Applies `HOST`, `PORT`, `MAX_FILE_SIZE`, ... from `lookup` onto `config`.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = parse_value("PORT", &port)?;
    }
    if let Some(origins) = lookup("CORS_ORIGINS") {
        config.server.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(dir) = lookup("UPLOAD_DIR") {
        config.uploads.dir = dir.into();
    }
    if let Some(size) = lookup("MAX_FILE_SIZE") {
        config.uploads.max_file_size = parse_value("MAX_FILE_SIZE", &size)?;
    }
    if let Some(count) = lookup("MAX_FILES") {
        config.uploads.max_files = parse_value("MAX_FILES", &count)?;
    }

    if let Some(provider) = lookup("AI_PROVIDER") {
        config.provider.kind = ProviderKind::from_str(&provider).map_err(Error::config)?;
    }
    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.provider.openai.api_key = key;
    }
    if let Some(url) = lookup("OPENAI_BASE_URL") {
        config.provider.openai.base_url = url;
    }
    if let Some(token) = lookup("REPLICATE_API_TOKEN") {
        config.provider.replicate.api_token = token;
    }
    if let Some(url) = lookup("REPLICATE_BASE_URL") {
        config.provider.replicate.base_url = url;
    }

    if let Some(flag) = lookup("DEMO_MODE") {
        config.demo.enabled = matches!(flag.trim().to_ascii_lowercase().as_str(), "true" | "1");
    }
    if let Some(url) = lookup("DEMO_IMAGE_URL") {
        config.demo.image_url = url;
    }

    if config.uploads.max_files == 0 {
        return Err(Error::config("MAX_FILES must be at least 1"));
    }
    if config.uploads.max_file_size == 0 {
        return Err(Error::config("MAX_FILE_SIZE must be greater than 0"));
    }
    if config.provider.replicate.poll_interval_ms == 0 {
        return Err(Error::config("provider.replicate.poll_interval_ms must be greater than 0"));
    }
    if config.provider.replicate.max_wait_secs == 0 {
        return Err(Error::config("provider.replicate.max_wait_secs must be greater than 0"));
    }

    Ok(config)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid value for {}: '{}'", key, raw)))
}
