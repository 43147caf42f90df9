use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Where the drum-removal backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// User-configurable paths for downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory that processed/original downloads are written to.
    /// Defaults to `~/drummer-downloads`.
    #[serde(default = "platform::downloads_dir")]
    pub downloads_dir: PathBuf,
}

/// Cadence of the synthetic progress steps shown while a submission runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_upload_interval_ms")]
    pub upload_interval_ms: u64,
    #[serde(default = "default_remote_interval_ms")]
    pub remote_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            downloads_dir: platform::downloads_dir(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            upload_interval_ms: default_upload_interval_ms(),
            remote_interval_ms: default_remote_interval_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_upload_interval_ms() -> u64 {
    2000
}

fn default_remote_interval_ms() -> u64 {
    3000
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            paths: PathsConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.progress.upload_interval_ms, 2000);
        assert_eq!(config.progress.remote_interval_ms, 3000);
        assert!(config.paths.downloads_dir.ends_with("drummer-downloads"));
        assert!(Config::config_path().ends_with("drummer/config.toml"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml("[server]\nbase_url = \"http://nas:9000\"\n").unwrap();
        assert_eq!(config.server.base_url, "http://nas:9000");
        assert_eq!(config.progress.remote_interval_ms, 3000);
    }
}
