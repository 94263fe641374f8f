//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use netskel_protocol::DEPLOY_DIR;

/// Configuration shared by `netskel-server` and `netskelctl`
///
/// Relative paths are resolved against `base_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Installation directory; the deployment tree lives in `<base_dir>/db`
    pub base_dir: PathBuf,

    /// Client registry file
    pub client_db: PathBuf,

    /// Trusted-access file new public keys are appended to
    pub authorized_keys: PathBuf,

    /// Self-update binary offered first in every manifest
    pub client_binary: PathBuf,

    /// Server log file; logs go to stderr when unset
    pub log_file: Option<PathBuf>,

    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,

    /// How long to wait for the registry lock, in seconds
    #[serde(with = "duration_secs")]
    pub lock_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_base_dir(super::DEFAULT_BASE_DIR)
    }
}

impl ServerConfig {
    /// Default configuration rooted at `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let authorized_keys = dirs::home_dir()
            .map(|home| home.join(".ssh").join("authorized_keys"))
            .unwrap_or_else(|| PathBuf::from("authorized_keys"));

        Self {
            base_dir: base_dir.into(),
            client_db: PathBuf::from("clients.db"),
            authorized_keys,
            client_binary: PathBuf::from("bin").join("netskel"),
            log_file: Some(PathBuf::from("netskel-server.log")),
            log_level: "info".to_string(),
            lock_timeout: Duration::from_secs(2),
        }
    }

    /// Directory whose contents make up the manifest
    pub fn deploy_root(&self) -> PathBuf {
        self.base_dir.join(DEPLOY_DIR)
    }

    pub fn client_db_path(&self) -> PathBuf {
        self.resolve(&self.client_db)
    }

    pub fn authorized_keys_path(&self) -> PathBuf {
        self.resolve(&self.authorized_keys)
    }

    pub fn client_binary_path(&self) -> PathBuf {
        self.resolve(&self.client_binary)
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|p| self.resolve(p))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if let Ok(rest) = path.strip_prefix("~") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

// Durations are written as whole seconds
mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let config = ServerConfig::with_base_dir("/srv/netskel");
        assert_eq!(config.deploy_root(), PathBuf::from("/srv/netskel/db"));
        assert_eq!(config.client_binary_path(), PathBuf::from("/srv/netskel/bin/netskel"));
        assert_eq!(
            config.log_file_path(),
            Some(PathBuf::from("/srv/netskel/netskel-server.log"))
        );
    }

    #[test]
    fn test_home_paths_expand() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let mut config = ServerConfig::with_base_dir("/srv/netskel");
        config.authorized_keys = PathBuf::from("~/.ssh/authorized_keys");
        assert_eq!(
            config.authorized_keys_path(),
            home.join(".ssh").join("authorized_keys")
        );
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let mut config = ServerConfig::with_base_dir("/srv/netskel");
        config.client_db = PathBuf::from("/var/lib/netskel/clients.db");
        assert_eq!(config.client_db_path(), PathBuf::from("/var/lib/netskel/clients.db"));
    }
}
