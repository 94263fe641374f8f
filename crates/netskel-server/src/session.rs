//! Per-invocation session

use netskel_core::NetskelError;
use netskel_protocol::{ClientId, Request};

/// Environment variable sshd sets to `<addr> <port> <local port>`
pub const SSH_CLIENT_ENV: &str = "SSH_CLIENT";

/// One client request together with where it came from
///
/// Lives for a single invocation and is never persisted as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Caller address as reported by sshd
    pub remote_addr: String,
    /// Parsed request
    pub request: Request,
}

impl Session {
    pub fn new(request: Request, remote_addr: impl Into<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            request,
        }
    }

    /// Parse a raw request line
    pub fn parse(line: &str, remote_addr: impl Into<String>) -> Result<Self, NetskelError> {
        Ok(Self::new(Request::parse(line)?, remote_addr))
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.request.client_id()
    }

    pub fn username(&self) -> &str {
        &self.request.username
    }

    pub fn hostname(&self) -> &str {
        &self.request.hostname
    }

    /// `user@host at addr (uuid)` for log lines
    pub fn describe(&self) -> String {
        format!(
            "{}@{} at {} ({})",
            self.request.username, self.request.hostname, self.remote_addr, self.request.identity
        )
    }
}

/// Extract the caller address from an `SSH_CLIENT` value
pub fn remote_addr_from(ssh_client: &str) -> String {
    ssh_client
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Caller address of the current process, empty outside sshd
pub fn remote_addr_from_env() -> String {
    std::env::var(SSH_CLIENT_ENV)
        .map(|value| remote_addr_from(&value))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_addr_from() {
        assert_eq!(remote_addr_from("192.0.2.10 51234 22"), "192.0.2.10");
        assert_eq!(remote_addr_from("2001:db8::1 51234 22"), "2001:db8::1");
        assert_eq!(remote_addr_from(""), "");
    }

    #[test]
    fn test_describe() {
        let session = Session::parse(
            "netskeldb 6ec558e1-5f06-4083-9070-206819b53916 luser host.example.com",
            "192.0.2.10",
        )
        .unwrap();
        assert_eq!(
            session.describe(),
            "luser@host.example.com at 192.0.2.10 (6ec558e1-5f06-4083-9070-206819b53916)"
        );
    }
}
