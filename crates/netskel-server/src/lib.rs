//! netskel-server: Forced-command server for Netskel
//!
//! Every SSH session a managed client opens runs this server exactly once.
//! The client's original command line arrives as an opaque string; the
//! server parses it, records a heartbeat, runs one handler and exits. No
//! state survives between calls except the client registry and the
//! trusted-access file.

pub mod dispatcher;
pub mod heartbeat;
pub mod keys;
pub mod manifest;
pub mod session;
pub mod transfer;

pub use dispatcher::Dispatcher;
pub use keys::KeyIssuer;
pub use manifest::ManifestGenerator;
pub use session::Session;
pub use transfer::Encoding;
