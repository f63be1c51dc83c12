//! Client configuration, read from TOML.
//!
//! ```toml
//! api_url = "https://example.com/api"
//! request_timeout_secs = 15
//! credential_path = "/home/me/.config/portfolio-admin/credential.json"
//! ```
//!
//! Every key is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const APP_DIR: &str = "portfolio-admin";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base of every API path, without a trailing `/`.
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Overrides the platform default credential file.
    pub credential_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 30,
            credential_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: ClientConfig = toml::from_str(contents)?;
        if config.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), api_url = %config.api_url, "Loaded config");
        Ok(config)
    }

    /// Reads `<config dir>/portfolio-admin/config.toml` when it exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured credential file, or the platform default.
    pub fn credential_path(&self) -> Option<PathBuf> {
        self.credential_path
            .clone()
            .or_else(crate::session::FileCredentialStore::default_path)
    }
}
