//! Client configuration
//!
//! Values come from built-in defaults, then an optional config file, then
//! `CBG_*` environment variables (highest precedence).

use crate::CoreResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `CBG_API_URL`
pub const ENV_PREFIX: &str = "CBG";

/// Base URL used when `CBG_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

/// Fixed per-request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Where the client sends the user after an authentication failure
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address every request path is appended to
    pub api_url: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Login route used on authentication failure
    pub login_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration with defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment override cannot be parsed
    pub fn from_env() -> CoreResult<Self> {
        Self::build(None, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from a file, still honouring environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        Self::build(
            Some(path.as_ref()),
            config::Environment::with_prefix(ENV_PREFIX),
        )
    }

    fn build(file: Option<&Path>, environment: config::Environment) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("login_path", defaults.login_path)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(environment.try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::build(None, env(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.api_url, "http://localhost:4000/api");
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn test_env_overrides_api_url() {
        let config = ApiConfig::build(
            None,
            env(&[("CBG_API_URL", "https://connect.example.org/api")]),
        )
        .unwrap();

        assert_eq!(config.api_url, "https://connect.example.org/api");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_env_overrides_timeout() {
        let config = ApiConfig::build(None, env(&[("CBG_TIMEOUT_MS", "5000")])).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = ApiConfig::build(None, env(&[("CBG_TIMEOUT_MS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_then_env_precedence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            "api_url = \"http://file.local/api\"\nlogin_path = \"/signin\"\n",
        )
        .unwrap();

        let config = ApiConfig::build(
            Some(&path),
            env(&[("CBG_API_URL", "http://env.local/api")]),
        )
        .unwrap();

        assert_eq!(config.api_url, "http://env.local/api");
        assert_eq!(config.login_path, "/signin");
    }
}
