//! Core domain types

use serde::Serialize;
use std::collections::BTreeMap;

/// Field names stored in a client namespace
pub mod fields {
    pub const HOSTNAME: &str = "hostname";
    pub const ORIGINAL_HOSTNAME: &str = "originalHostname";
    pub const USERNAME: &str = "username";
    pub const INET: &str = "inet";
    pub const LAST_SEEN: &str = "lastSeen";
    pub const CREATED: &str = "created";
    pub const DISABLED: &str = "disabled";
    pub const UNAME: &str = "uname";

    /// Fields holding epoch seconds
    pub const EPOCH_FIELDS: [&str; 3] = [CREATED, LAST_SEEN, DISABLED];

    /// Whether a field holds epoch seconds
    pub fn is_epoch(name: &str) -> bool {
        EPOCH_FIELDS.contains(&name)
    }
}

/// Everything the registry knows about one client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    /// Namespace key (the client UUID)
    pub uuid: String,
    /// Field name to value, in name order
    pub fields: BTreeMap<String, String>,
}

impl ClientRecord {
    /// Create an empty record
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Current hostname, if recorded
    pub fn hostname(&self) -> Option<&str> {
        self.get(fields::HOSTNAME)
    }

    /// A client is disabled when `disabled` is present and non-empty
    pub fn is_disabled(&self) -> bool {
        self.get(fields::DISABLED).is_some_and(|v| !v.is_empty())
    }

    /// Parse an epoch-seconds field
    pub fn epoch(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.trim().parse().ok())
    }

    /// Last heartbeat time in epoch seconds
    pub fn last_seen(&self) -> Option<i64> {
        self.epoch(fields::LAST_SEEN)
    }
}
