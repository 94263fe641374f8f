//! netskelctl: Client registry administration for Netskel
//!
//! Lists, searches and audits registered clients, and enables, disables or
//! removes them. Works directly on the registry file the server writes.

pub mod commands;
pub mod error;
pub mod output;

pub use commands::{RecordFilter, RegistryAdmin};
pub use error::AdminError;
