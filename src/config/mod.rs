//! Configuration management for three-play.
//!
//! Settings are resolved per field from, in order: an explicit [`configure`]
//! call, environment variables, the optional TOML config file, and defaults.

pub mod file;

use std::sync::RwLock;

pub use file::{get_config_path, ApiSection, FileConfig, HttpConfig};

use crate::error::Result;

/// Default root of the 3Play v3 REST API.
pub const API_ENDPOINT: &str = "https://api.3playmedia.com/v3/";

/// API key for requests to the 3Play API.
pub const API_KEY_ENV: &str = "3PLAY_API_KEY";

/// Service integration id on 3Play, for example an integration with YouTube.
pub const INTEGRATION_ID_ENV: &str = "INTEGRATION_ID";

/// Override for [`API_ENDPOINT`].
pub const BASE_URL_ENV: &str = "3PLAY_BASE_URL";

static API_KEY_OVERRIDE: RwLock<Option<String>> = RwLock::new(None);

/// Sets the process-wide API key.
///
/// Takes precedence over `3PLAY_API_KEY` and the config file for every
/// [`Config`] loaded afterwards. Calling it again replaces the key.
pub fn configure(api_key: impl Into<String>) {
    let mut guard = API_KEY_OVERRIDE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(api_key.into());
    tracing::debug!("3Play API key configured explicitly");
}

pub(crate) fn configured_api_key() -> Option<String> {
    API_KEY_OVERRIDE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Resolved client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` is allowed here; requests fail with `MissingApiKey` at call time.
    pub api_key: Option<String>,
    pub integration_id: Option<String>,
    /// Always ends with `/`
    pub base_url: String,
    pub http: HttpConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("integration_id", &self.integration_id)
            .field("base_url", &self.base_url)
            .field("http", &self.http)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            integration_id: None,
            base_url: API_ENDPOINT.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Config with an explicit key and defaults for everything else.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Loads configuration from `configure`, the environment and the config file.
    ///
    /// # Errors
    /// - If the config file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        let file = FileConfig::load()?;
        Ok(Self::resolve(
            configured_api_key(),
            |name| std::env::var(name).ok(),
            file,
        ))
    }

    /// Merges the configuration sources; the first non-empty value wins.
    pub fn resolve(
        explicit_api_key: Option<String>,
        env: impl Fn(&str) -> Option<String>,
        file: Option<FileConfig>,
    ) -> Self {
        let file = file.unwrap_or_default();
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let api_key = explicit_api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| lookup(API_KEY_ENV))
            .or(file.api.api_key);
        let integration_id = lookup(INTEGRATION_ID_ENV).or(file.api.integration_id);
        let base_url = lookup(BASE_URL_ENV)
            .or(file.api.base_url)
            .unwrap_or_else(|| API_ENDPOINT.to_string());

        Self {
            api_key,
            integration_id,
            base_url: normalize_base_url(&base_url),
            http: file.http,
        }
    }

    /// Sets the API root, adding the trailing slash the path join relies on.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}

fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_explicit_key_wins() {
        let file = FileConfig {
            api: ApiSection {
                api_key: Some("file-key".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = Config::resolve(
            Some("explicit".to_string()),
            env_from(&[(API_KEY_ENV, "env-key")]),
            Some(file),
        );
        assert_eq!(config.api_key.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_env_then_file() {
        let file = FileConfig {
            api: ApiSection {
                api_key: Some("file-key".to_string()),
                integration_id: Some("file-integration".to_string()),
                base_url: Some("http://localhost:9000/v3".to_string()),
            },
            ..Default::default()
        };

        let config = Config::resolve(None, env_from(&[(API_KEY_ENV, "env-key")]), Some(file.clone()));
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.integration_id.as_deref(), Some("file-integration"));
        assert_eq!(config.base_url, "http://localhost:9000/v3/");

        let config = Config::resolve(None, env_from(&[(API_KEY_ENV, "  ")]), Some(file));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_nothing_configured() {
        let config = Config::resolve(None, env_from(&[]), None);
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, API_ENDPOINT);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::with_api_key("super-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
