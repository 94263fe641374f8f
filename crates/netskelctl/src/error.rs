//! Admin error types

use netskel_core::StoreError;
use thiserror::Error;

/// Errors raised by admin commands
#[derive(Error, Debug)]
pub enum AdminError {
    /// No namespace exists for the UUID
    #[error("Unknown client: {0}")]
    UnknownClient(String),

    /// Argument rejected before touching the registry
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Registry failure
    #[error("Registry error: {0}")]
    Store(#[from] StoreError),
}
