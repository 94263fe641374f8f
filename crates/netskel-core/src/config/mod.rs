//! Configuration management for Netskel

mod server;

pub use server::ServerConfig;

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Default installation directory
pub const DEFAULT_BASE_DIR: &str = "/usr/local/netskel";

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "NETSKEL_CONFIG";

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DIR).join("netskel.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve the server configuration
///
/// An explicit path must exist. Without one the default path is used when
/// present, otherwise built-in defaults apply.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        load_config(&default_path)
    } else {
        tracing::debug!("Using default configuration");
        Ok(ServerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = load_config::<ServerConfig>(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("netskel.toml");
        std::fs::write(&path, "base_dir = \"/srv/netskel\"\nlock_timeout = 5\n").unwrap();

        let config: ServerConfig = load_config(&path).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/netskel"));
        assert_eq!(config.lock_timeout, Duration::from_secs(5));
        assert_eq!(config.client_db_path(), PathBuf::from("/srv/netskel/clients.db"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("netskel.toml");
        std::fs::write(&path, "lock_timeout = \"soon\"").unwrap();

        assert!(matches!(
            load_config::<ServerConfig>(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_resolve_explicit_missing() {
        let dir = TempDir::new().unwrap();
        assert!(resolve_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
