//! Command kinds and their positional argument schemas
//!
//! Every kind declares its arguments up front. Parsing walks the schema
//! instead of indexing into the token list, so a short request can only ever
//! produce a missing-argument error or a default value.

use std::fmt;

/// The closed set of requests a client may make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Issue a brand-new identity and private key (`addkey`)
    AddKey,
    /// Send the deployment manifest (`netskeldb`)
    Manifest,
    /// Send a file as wrapped lowercase hex (`sendfile`)
    SendHex,
    /// Send a file as wrapped base64 (`sendbase64`)
    SendBase64,
    /// Send the self-update binary verbatim (`rawclient`)
    SendRaw,
    /// Record the client's `uname` string (`uname`)
    Uname,
    /// Print the content fingerprint of a file (`md5`)
    Fingerprint,
}

/// How a command treats the client identity token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// Command carries no identity
    None,
    /// Missing or malformed identity aborts the request
    Required,
    /// Missing or malformed identity falls back to anonymous
    Optional,
}

/// What a positional argument holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// File path relative to the server base directory
    Path,
    /// Client UUID
    Client,
    /// Remote username
    Username,
    /// Remote hostname
    Hostname,
    /// Every remaining token, joined by single spaces
    Rest,
}

impl FieldKind {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Path => "path",
            FieldKind::Client => "uuid",
            FieldKind::Username => "username",
            FieldKind::Hostname => "hostname",
            FieldKind::Rest => "trailing",
        }
    }
}

/// One positional argument in a command schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn required(kind: FieldKind) -> Self {
        Self { kind, required: true }
    }

    const fn optional(kind: FieldKind) -> Self {
        Self { kind, required: false }
    }
}

const ADD_KEY_SCHEMA: &[FieldSpec] = &[
    FieldSpec::optional(FieldKind::Username),
    FieldSpec::optional(FieldKind::Hostname),
];

const MANIFEST_SCHEMA: &[FieldSpec] = &[
    FieldSpec::required(FieldKind::Client),
    FieldSpec::optional(FieldKind::Username),
    FieldSpec::optional(FieldKind::Hostname),
];

const SEND_FILE_SCHEMA: &[FieldSpec] = &[
    FieldSpec::required(FieldKind::Path),
    FieldSpec::optional(FieldKind::Client),
    FieldSpec::optional(FieldKind::Username),
    FieldSpec::optional(FieldKind::Hostname),
];

const SEND_RAW_SCHEMA: &[FieldSpec] = &[
    FieldSpec::optional(FieldKind::Client),
    FieldSpec::optional(FieldKind::Username),
    FieldSpec::optional(FieldKind::Hostname),
];

const UNAME_SCHEMA: &[FieldSpec] = &[
    FieldSpec::required(FieldKind::Client),
    FieldSpec::required(FieldKind::Username),
    FieldSpec::required(FieldKind::Hostname),
    FieldSpec::required(FieldKind::Rest),
];

const FINGERPRINT_SCHEMA: &[FieldSpec] = &[FieldSpec::required(FieldKind::Path)];

impl CommandKind {
    /// All command kinds
    pub const ALL: [CommandKind; 7] = [
        CommandKind::AddKey,
        CommandKind::Manifest,
        CommandKind::SendHex,
        CommandKind::SendBase64,
        CommandKind::SendRaw,
        CommandKind::Uname,
        CommandKind::Fingerprint,
    ];

    /// Token that selects this command on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            CommandKind::AddKey => "addkey",
            CommandKind::Manifest => "netskeldb",
            CommandKind::SendHex => "sendfile",
            CommandKind::SendBase64 => "sendbase64",
            CommandKind::SendRaw => "rawclient",
            CommandKind::Uname => "uname",
            CommandKind::Fingerprint => "md5",
        }
    }

    /// Look up a command by its wire token (case-insensitive)
    pub fn from_wire(token: &str) -> Option<Self> {
        let token = token.to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.wire_name() == token)
    }

    /// Positional arguments following the command token
    pub fn schema(&self) -> &'static [FieldSpec] {
        match self {
            CommandKind::AddKey => ADD_KEY_SCHEMA,
            CommandKind::Manifest => MANIFEST_SCHEMA,
            CommandKind::SendHex | CommandKind::SendBase64 => SEND_FILE_SCHEMA,
            CommandKind::SendRaw => SEND_RAW_SCHEMA,
            CommandKind::Uname => UNAME_SCHEMA,
            CommandKind::Fingerprint => FINGERPRINT_SCHEMA,
        }
    }

    /// How this command treats the identity token
    pub fn identity_policy(&self) -> IdentityPolicy {
        match self {
            CommandKind::Manifest | CommandKind::Uname => IdentityPolicy::Required,
            CommandKind::SendHex | CommandKind::SendBase64 | CommandKind::SendRaw => {
                IdentityPolicy::Optional
            }
            CommandKind::AddKey | CommandKind::Fingerprint => IdentityPolicy::None,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}
