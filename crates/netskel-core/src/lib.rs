//! netskel-core: Core abstractions and configuration for Netskel
//!
//! This crate provides the shared types, error taxonomy, configuration and
//! client registry used by the forced-command server and the admin tool.

pub mod config;
pub mod error;
pub mod registry;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{ConfigError, CryptoError, NetskelError, StoreError};
pub use registry::ClientRegistry;
pub use traits::ClientStore;
pub use types::ClientRecord;

pub use netskel_protocol::{ClientId, ClientIdentity};
