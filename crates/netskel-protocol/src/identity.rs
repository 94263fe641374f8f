//! Client identity types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::IdentityError;

/// Rendering of a session that carries no client identity
pub const NO_IDENTITY: &str = "nouuid";

/// Length of the hyphenated 8-4-4-4-12 form
const CANONICAL_LEN: usize = 36;

/// Server-issued identity of a managed client
///
/// Always generated by the server at key issuance. Values read back from
/// client requests are only ever used as lookup keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Generate a fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied token
    ///
    /// Only the hyphenated form is accepted; hex digits may be either case
    /// and are normalised to lowercase by `Display`.
    pub fn parse(value: &str) -> Result<Self, IdentityError> {
        let uuid = Uuid::parse_str(value).map_err(|source| IdentityError::Malformed {
            value: value.to_string(),
            source,
        })?;

        if value.len() != CANONICAL_LEN {
            return Err(IdentityError::NotCanonical(value.to_string()));
        }

        Ok(Self(uuid))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ClientId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ClientId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identity carried by a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientIdentity {
    /// Request named a valid client
    Known(ClientId),
    /// No usable identity (not issued yet, absent or malformed)
    #[default]
    Anonymous,
}

impl ClientIdentity {
    /// Get the client ID if there is one
    pub fn client_id(&self) -> Option<&ClientId> {
        match self {
            ClientIdentity::Known(id) => Some(id),
            ClientIdentity::Anonymous => None,
        }
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientIdentity::Known(id) => write!(f, "{}", id),
            ClientIdentity::Anonymous => write!(f, "{}", NO_IDENTITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let id = ClientId::parse("6ec558e1-5f06-4083-9070-206819b53916").unwrap();
        assert_eq!(id.to_string(), "6ec558e1-5f06-4083-9070-206819b53916");
    }

    #[test]
    fn test_parse_normalises_case() {
        let id = ClientId::parse("6EC558E1-5F06-4083-9070-206819B53916").unwrap();
        assert_eq!(id.to_string(), "6ec558e1-5f06-4083-9070-206819b53916");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            ClientId::parse("this-is-a-malformed-uuid"),
            Err(IdentityError::Malformed { .. })
        ));
        assert!(ClientId::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_non_hyphenated() {
        assert!(matches!(
            ClientId::parse("6ec558e15f0640839070206819b53916"),
            Err(IdentityError::NotCanonical(_))
        ));
        assert!(ClientId::parse("{6ec558e1-5f06-4083-9070-206819b53916}").is_err());
    }

    #[test]
    fn test_generate_is_canonical() {
        let id = ClientId::generate();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 36);
        assert_eq!(ClientId::parse(&rendered).unwrap(), id);
        assert_ne!(ClientId::generate(), id);
    }

    #[test]
    fn test_anonymous_display() {
        assert_eq!(ClientIdentity::Anonymous.to_string(), "nouuid");
        assert!(ClientIdentity::Anonymous.client_id().is_none());
    }
}
