//! Protocol error types

use thiserror::Error;

/// Errors raised while turning the opaque request string into a typed request
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Nothing but whitespace was received
    #[error("Empty request")]
    EmptyRequest,

    /// First token is not a known command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A positional argument the command cannot run without is absent
    #[error("Missing {argument} argument for {command}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// Identity token missing or malformed where the command requires one
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Client identity errors
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Token does not parse as a UUID
    #[error("Malformed client UUID {value:?}: {source}")]
    Malformed {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// Token parses but is not in hyphenated 8-4-4-4-12 form
    #[error("Client UUID {0:?} is not in canonical hyphenated form")]
    NotCanonical(String),

    /// Command requires a client UUID and none was given
    #[error("{0} requires a client UUID")]
    Missing(&'static str),
}
