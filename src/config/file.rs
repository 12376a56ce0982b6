//! Configuration file management for three-play.
//!
//! The file is optional and read-only from the library's point of view: it is
//! stored in the user's config directory and only consulted for values that
//! were not configured explicitly or through the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ThreePlayError};

/// Credentials and endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiSection {
    /// 3Play project API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Integration used when creating media files (e.g. a YouTube integration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<String>,
    /// Override for the API root, mainly for testing against a proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// HTTP client tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// Overall timeout for regular requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connection establishment timeout
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Retries after the first attempt for connect errors and retryable statuses
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial backoff between retries, doubled each time
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Timeout for order requests, which 3Play is slow to answer
    #[serde(default = "default_order_timeout_secs")]
    pub order_timeout_secs: u64,
    /// Statuses that are retried
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_order_timeout_secs() -> u64 {
    2
}

fn default_retry_statuses() -> Vec<u16> {
    vec![413, 429, 500, 502, 503, 504]
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            order_timeout_secs: default_order_timeout_secs(),
            retry_statuses: default_retry_statuses(),
        }
    }
}

/// Contents of `three-play.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub http: HttpConfig,
}

impl FileConfig {
    /// Loads the config file from the user's config directory.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    /// - If the file exists but cannot be read
    /// - If the TOML is malformed
    pub fn load() -> Result<Option<Self>> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Loads a config file from an explicit path.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ThreePlayError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            ThreePlayError::Config(format!("Invalid config file {}: {e}", path.display()))
        })?;

        tracing::debug!("Loaded config file: {}", path.display());
        Ok(Some(config))
    }

    /// Template written by `three-play config` when no file exists yet.
    pub fn template() -> String {
        let mut content = String::from(
            "# three-play configuration\n\
             # Values here are used only when not set through the environment\n\
             # (3PLAY_API_KEY, INTEGRATION_ID, 3PLAY_BASE_URL).\n\n",
        );
        content.push_str(&toml::to_string_pretty(&FileConfig::default()).unwrap_or_default());
        content
    }
}

/// Path to the config file: `~/.config/three-play/three-play.toml`.
pub fn get_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("three-play").join("three-play.toml"))
}
