//! Redraft configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Correction service configuration
    pub service: ServiceConfig,

    /// Snapshot storage configuration
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path, then project-local `.redraft.yml`, then
    /// `~/.config/redraft/redraft.yml`, then defaults. After the chain, a
    /// `config.json` document with a `url` field (the deployment descriptor
    /// the original web client bootstraps from) overrides the service URL.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_chain(config_path)?;
        if let Some(url) = load_service_url_override() {
            tracing::info!(%url, "Service URL overridden by config.json");
            config.service.url = url;
        }
        Ok(config)
    }

    fn load_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".redraft.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("redraft").join("redraft.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Correction service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service base URL
    pub url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature sent with every request
    pub temperature: f32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            timeout_ms: 60_000,
            temperature: 0.3,
        }
    }
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted session snapshot
    #[serde(rename = "state-dir")]
    pub state_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let state_dir = dirs::data_dir()
            .map(|d| d.join("redraft"))
            .unwrap_or_else(|| PathBuf::from(".redraft"));

        Self { state_dir }
    }
}

/// Read the service URL from a `config.json` deployment descriptor
///
/// Checked in the working directory first, then in the user config dir.
/// Missing files and malformed documents are tolerated silently.
fn load_service_url_override() -> Option<String> {
    let mut candidates = vec![PathBuf::from("config.json")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("redraft").join("config.json"));
    }

    for path in candidates {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(doc) => {
                if let Some(url) = doc.get("url").and_then(|v| v.as_str()) {
                    return Some(url.to_string());
                }
                tracing::warn!("{}: no \"url\" field, ignoring", path.display());
            }
            Err(e) => {
                tracing::warn!("{}: malformed config.json: {}", path.display(), e);
            }
        }
    }

    None
}
