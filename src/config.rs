//! Application configuration management.
//!
//! Configuration is stored at `~/.config/portal-tui/config.json`. The
//! backend base URL can be overridden per run with `PORTAL_BACKEND_URL`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "portal-tui";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend base URL (the dev-mode reverse proxy origin).
const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub last_email: Option<String>,
    /// When true, a screen with an outstanding request ignores further
    /// submits. Off reproduces plain browser-form behavior.
    pub guard_double_submit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            last_email: None,
            guard_double_submit: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for logs and other runtime state.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert!(config.last_email.is_none());
        assert!(config.guard_double_submit);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"backend_url":"https://portal.example.com"}"#)
                .expect("parse partial config");
        assert_eq!(config.backend_url, "https://portal.example.com");
        assert!(config.guard_double_submit);
    }
}
