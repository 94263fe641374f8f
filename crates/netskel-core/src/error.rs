//! Core error types for Netskel

use netskel_protocol::{IdentityError, ProtocolError};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a single Netskel invocation
///
/// Every variant is terminal for the call that raised it.
#[derive(Error, Debug)]
pub enum NetskelError {
    /// Request could not be understood
    #[error("Protocol error: {0}")]
    Protocol(ProtocolError),

    /// Client UUID missing or malformed where one is required
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Client registry failure
    #[error("Registry error: {0}")]
    Store(#[from] StoreError),

    /// Key generation or encoding failure
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File access failure on a known path
    #[error("I/O error on {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetskelError {
    /// Attach a path to an I/O error
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetskelError::File {
            path: path.into(),
            source,
        }
    }
}

impl From<ProtocolError> for NetskelError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Identity(e) => NetskelError::Identity(e),
            other => NetskelError::Protocol(other),
        }
    }
}

/// Client registry errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another process held the store lock for longer than the lock timeout
    #[error("Client registry is locked by another process")]
    Locked,

    /// Store file could not be opened
    #[error("Failed to open client registry {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Any other engine failure
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl StoreError {
    /// Whether an engine error means the lock wait timed out
    pub fn is_busy(err: &rusqlite::Error) -> bool {
        matches!(
            err.sqlite_error_code(),
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked)
        )
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if Self::is_busy(&err) {
            StoreError::Locked
        } else {
            StoreError::Sqlite(err)
        }
    }
}

/// Key generation and encoding errors
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Keypair generation failed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Key could not be serialized
    #[error("Key encoding failed: {0}")]
    Encoding(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
