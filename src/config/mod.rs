mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub mood_endpoint_url: Option<String>,
    pub catalog_base_url: Option<String>,
    pub catalog_token: Option<String>,
    pub recommendation_limit: usize,
    pub enqueue_delay_ms: u64,
    pub reconnect_delay_ms: u64,
    pub classifier_timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            mood_endpoint_url: None,
            catalog_base_url: None,
            catalog_token: None,
            recommendation_limit: 20,
            enqueue_delay_ms: 500,
            reconnect_delay_ms: 2000,
            classifier_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sqlite file backing the key/value snapshot store.
    pub db_path: PathBuf,
    pub mood_endpoint_url: Option<String>,
    pub catalog_base_url: Option<String>,
    pub catalog_token: Option<String>,
    pub recommendation_limit: usize,
    pub enqueue_delay_ms: u64,
    pub reconnect_delay_ms: u64,
    pub classifier_timeout_secs: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from("moodqueue.db"));

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let recommendation_limit = file
            .recommendation_limit
            .unwrap_or(cli.recommendation_limit);
        if recommendation_limit == 0 {
            bail!("recommendation_limit must be at least 1");
        }

        Ok(AppConfig {
            db_path,
            mood_endpoint_url: file.mood_endpoint_url.or_else(|| cli.mood_endpoint_url.clone()),
            catalog_base_url: file.catalog_base_url.or_else(|| cli.catalog_base_url.clone()),
            catalog_token: file.catalog_token.or_else(|| cli.catalog_token.clone()),
            recommendation_limit,
            enqueue_delay_ms: file.enqueue_delay_ms.unwrap_or(cli.enqueue_delay_ms),
            reconnect_delay_ms: file.reconnect_delay_ms.unwrap_or(cli.reconnect_delay_ms),
            classifier_timeout_secs: file
                .classifier_timeout_secs
                .unwrap_or(cli.classifier_timeout_secs),
        })
    }
}
