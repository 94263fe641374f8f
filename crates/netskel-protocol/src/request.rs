//! Parsing of the opaque request string

use crate::command::{CommandKind, FieldKind, FieldSpec, IdentityPolicy};
use crate::error::{IdentityError, ProtocolError};
use crate::identity::{ClientId, ClientIdentity};
use crate::{DEFAULT_HOSTNAME, DEFAULT_USERNAME};

/// A client request, validated against its command schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Which command was asked for
    pub kind: CommandKind,
    /// Client identity, anonymous when the command carries none
    pub identity: ClientIdentity,
    /// Remote username
    pub username: String,
    /// Remote hostname
    pub hostname: String,
    /// File path argument, for commands that take one
    pub path: Option<String>,
    /// Trailing words, for commands that take them
    pub rest: Option<String>,
    /// Raw argument tokens after the command token
    pub args: Vec<String>,
}

impl Request {
    /// Parse a whitespace-separated request
    ///
    /// Tokens beyond the command schema are kept in `args` but otherwise
    /// ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (first, args) = tokens.split_first().ok_or(ProtocolError::EmptyRequest)?;

        let kind = CommandKind::from_wire(first)
            .ok_or_else(|| ProtocolError::UnknownCommand(first.to_string()))?;

        let mut request = Request {
            kind,
            identity: ClientIdentity::Anonymous,
            username: DEFAULT_USERNAME.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            path: None,
            rest: None,
            args: args.iter().map(|s| s.to_string()).collect(),
        };

        let mut remaining = args.iter();
        for spec in kind.schema() {
            if spec.kind == FieldKind::Rest {
                let words: Vec<&str> = remaining.by_ref().copied().collect();
                if words.is_empty() {
                    if spec.required {
                        return Err(missing(kind, spec));
                    }
                } else {
                    request.rest = Some(words.join(" "));
                }
                break;
            }

            match remaining.next() {
                Some(token) => request.apply(spec.kind, token)?,
                None if spec.required => return Err(missing(kind, spec)),
                None => {}
            }
        }

        Ok(request)
    }

    /// Client ID, if the request carries a valid one
    pub fn client_id(&self) -> Option<&ClientId> {
        self.identity.client_id()
    }

    fn apply(&mut self, field: FieldKind, token: &str) -> Result<(), ProtocolError> {
        match field {
            FieldKind::Path => self.path = Some(token.to_string()),
            FieldKind::Username => self.username = token.to_string(),
            FieldKind::Hostname => self.hostname = token.to_string(),
            FieldKind::Client => self.identity = self.parse_identity(token)?,
            FieldKind::Rest => self.rest = Some(token.to_string()),
        }
        Ok(())
    }

    fn parse_identity(&self, token: &str) -> Result<ClientIdentity, IdentityError> {
        match (ClientId::parse(token), self.kind.identity_policy()) {
            (Ok(id), _) => Ok(ClientIdentity::Known(id)),
            (Err(e), IdentityPolicy::Required) => Err(e),
            (Err(e), _) => {
                tracing::warn!("Ignoring client UUID for {}: {}", self.kind, e);
                Ok(ClientIdentity::Anonymous)
            }
        }
    }
}

fn missing(kind: CommandKind, spec: &FieldSpec) -> ProtocolError {
    match spec.kind {
        FieldKind::Client => IdentityError::Missing(kind.wire_name()).into(),
        other => ProtocolError::MissingArgument {
            command: kind.wire_name(),
            argument: other.name(),
        },
    }
}
