use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// TOML file configuration. Every field is optional; present values
/// override their CLI counterparts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub mood_endpoint_url: Option<String>,
    pub catalog_base_url: Option<String>,
    pub catalog_token: Option<String>,
    pub recommendation_limit: Option<usize>,
    pub enqueue_delay_ms: Option<u64>,
    pub reconnect_delay_ms: Option<u64>,
    pub classifier_timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load<T: AsRef<Path>>(path: T) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {:?}", path.as_ref()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path.as_ref()))
    }
}
