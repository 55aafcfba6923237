use std::path::Path;

use serde::Deserialize;

use crate::error::{AdcraftError, AdcraftResult};

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `ADCRAFT__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub commit: CommitConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Thresholds for the combination preview grid.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Largest combination count that is previewed without an explicit request.
    #[serde(default = "default_auto_preview_limit")]
    pub auto_preview_limit: usize,
    /// Number of combinations revealed per proximity signal.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Ambient context stamped onto every committed ad record.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub subproject_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

// Default functions
fn default_auto_preview_limit() -> usize {
    100
}
fn default_page_size() -> usize {
    20
}
fn default_user_id() -> String {
    "local-user".to_string()
}
fn default_public_base_url() -> String {
    "https://storage.local/creatives".to_string()
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            auto_preview_limit: default_auto_preview_limit(),
            page_size: default_page_size(),
        }
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            project_id: None,
            subproject_id: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview: PreviewConfig::default(),
            commit: CommitConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("ADCRAFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }

    /// Reject values the preview policies cannot work with.
    pub fn validate(&self) -> AdcraftResult<()> {
        if self.preview.page_size == 0 {
            return Err(AdcraftError::Config(
                "preview.page_size must be at least 1".to_string(),
            ));
        }
        if self.commit.user_id.trim().is_empty() {
            return Err(AdcraftError::Config(
                "commit.user_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
