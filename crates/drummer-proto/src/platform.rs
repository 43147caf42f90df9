//! Per-user directories for the drummer client.

use std::path::PathBuf;

const APP_DIR: &str = "drummer";

/// Log file and other runtime data: `~/.local/share/drummer` on Linux.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(temp_dir)
        .join(APP_DIR)
}

/// Holds `config.toml`: `$XDG_CONFIG_HOME/drummer` on Linux.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(temp_dir)
        .join(APP_DIR)
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Default place for downloaded songs: `~/drummer-downloads`.
pub fn downloads_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(temp_dir)
        .join(format!("{}-downloads", APP_DIR))
}
