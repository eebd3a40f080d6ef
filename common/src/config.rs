use serde::Deserialize;
use std::{error::Error, fs};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommonConfig {
    pub project_name: String,
    pub database_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub common: CommonConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Reads a YAML config file. URLs containing `::` (such as
    /// `sqlite::memory:`) must be quoted in YAML.
    pub fn load(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let contents = fs::read_to_string(config_path)?;
        let config = serde_yml::from_str(&contents)?;

        Ok(config)
    }

    /// Applies `DATABASE_URL` and `LOG_LEVEL` from the process environment
    /// (after loading `.env`, if one exists).
    pub fn with_env_overrides(self) -> Self {
        dotenvy::dotenv().ok();
        self.with_overrides(
            std::env::var(DATABASE_URL_ENV).ok(),
            std::env::var(LOG_LEVEL_ENV).ok(),
        )
    }

    pub fn with_overrides(mut self, database_url: Option<String>, log_level: Option<String>) -> Self {
        if let Some(url) = database_url.filter(|url| !url.is_empty()) {
            tracing::debug!("Database URL overridden from environment");
            self.common.database_url = url;
        }
        if let Some(level) = log_level.filter(|level| !level.is_empty()) {
            self.catalog.log_level = level;
        }
        self
    }
}
