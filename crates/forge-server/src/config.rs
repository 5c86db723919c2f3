//! Server configuration
//!
//! Settings come from an optional `forge.config.yaml` next to the binary,
//! with environment variables taking precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["forge.config.yaml", "forge.config.yml"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Where the file-backed generation store keeps its records.
    pub data_dir: PathBuf,
    /// Base URL of the generateContent-style completion endpoint.
    pub completion_url: String,
    pub default_model: String,
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8790".to_string(),
            data_dir: dirs::data_dir()
                .map(|d| d.join("forge"))
                .unwrap_or_else(|| PathBuf::from("./data")),
            completion_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            default_model: "gemini-2.0-flash".to_string(),
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// Find a config file in `dir`.
    pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Load configuration: file first (if present), then env overrides.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut config = match Self::find_config_file(dir) {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(addr) = std::env::var("FORGE_BIND_ADDRESS") {
            config.bind_address = addr;
        }
        if let Ok(dir) = std::env::var("FORGE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("FORGE_COMPLETION_URL") {
            config.completion_url = url;
        }
        if let Ok(model) = std::env::var("FORGE_MODEL") {
            config.default_model = model;
        }
        if let Ok(key) = std::env::var("FORGE_API_KEY") {
            config.api_key = Some(key);
        }

        if config.api_key.is_none() {
            warn!("FORGE_API_KEY not set; completion requests will fail upstream");
        }

        Ok(config)
    }
}
