//! netskel-protocol: Forced-command request protocol for Netskel
//!
//! Every SSH session a client opens runs the Netskel server, which receives
//! the client's original command line as one opaque string. This crate
//! defines the vocabulary of that string: the closed set of command kinds,
//! the positional argument schema of each kind, and the line formats the
//! server writes back.

pub mod command;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod request;

pub use command::{CommandKind, FieldKind, FieldSpec, IdentityPolicy};
pub use error::{IdentityError, ProtocolError};
pub use identity::{ClientId, ClientIdentity};
pub use manifest::{ManifestEntry, FileMode};
pub use request::Request;

/// The only thing written to the caller when a request fails.
pub const ERROR_TOKEN: &str = "ERROR";

/// Username recorded when the client did not supply one.
pub const DEFAULT_USERNAME: &str = "user";

/// Hostname recorded when the client did not supply one.
pub const DEFAULT_HOSTNAME: &str = "unknown";

/// Path clients use to request the self-update binary.
///
/// This is the synthetic manifest entry as seen from the server's base
/// directory; it never exists inside the deployment tree.
pub const SELF_REQUEST_PATH: &str = "db/bin/netskel";

/// Directory holding the deployment tree, relative to the server base directory.
pub const DEPLOY_DIR: &str = "db";
