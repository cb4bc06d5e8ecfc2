//! CLI configuration utilities

use anyhow::{Context, Result};
use cbg_core::ApiConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File holding the stored session inside the data directory
pub const SESSION_FILE: &str = "session.json";

/// Load the API configuration, from `file` when given, else from the environment
pub fn load_api_config(file: Option<&Path>) -> Result<ApiConfig> {
    let config = match file {
        Some(path) => ApiConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ApiConfig::from_env().context("Failed to load configuration from environment")?,
    };
    debug!("Using API at {}", config.api_url);
    Ok(config)
}

/// Where the CLI keeps its session, falling back to the system data dir
pub fn session_path(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cbg-connect")
        })
        .join(SESSION_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_path_override() {
        let path = session_path(Some(PathBuf::from("/tmp/cbg")));
        assert_eq!(path, PathBuf::from("/tmp/cbg/session.json"));
    }

    #[test]
    fn test_session_path_default_ends_with_file() {
        let path = session_path(None);
        assert!(path.ends_with(Path::new("cbg-connect").join(SESSION_FILE)));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_api_config(Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }
}
