//! Request dispatch
//!
//! A `Dispatcher` lives for one invocation. It parses the request, records
//! the heartbeat and runs the handler for the command. Handlers write into
//! a buffer that only reaches the caller once the whole call succeeded;
//! on failure the caller sees the `ERROR` token and nothing else.

use chrono::Utc;
use std::io::{self, Write};

use netskel_core::config::ServerConfig;
use netskel_core::time::{current_time_secs, format_header_time};
use netskel_core::types::fields;
use netskel_core::{ClientStore, NetskelError};
use netskel_protocol::{CommandKind, IdentityPolicy, ERROR_TOKEN, SELF_REQUEST_PATH};

use crate::heartbeat::record_heartbeat;
use crate::keys::KeyIssuer;
use crate::manifest::{file_fingerprint, ManifestGenerator};
use crate::session::Session;
use crate::transfer::{resolve_request_path, send_file, Encoding};

/// Name this host reports in generated headers
pub fn local_hostname() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}

/// Runs one client request against a config and a client store
pub struct Dispatcher<'a> {
    config: &'a ServerConfig,
    store: &'a mut dyn ClientStore,
    server_name: String,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a ServerConfig, store: &'a mut dyn ClientStore) -> Self {
        Self {
            config,
            store,
            server_name: local_hostname(),
        }
    }

    /// Override the server name written in headers
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Run a raw request and write the response or `ERROR` to `out`
    ///
    /// Returns whether the request succeeded. Only failures writing to
    /// `out` itself are returned as errors.
    pub fn respond(
        &mut self,
        line: &str,
        remote_addr: &str,
        out: &mut dyn Write,
    ) -> io::Result<bool> {
        match self.handle(line, remote_addr) {
            Ok(response) => {
                out.write_all(&response)?;
                out.flush()?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Request {:?} from {:?} failed: {}", line, remote_addr, e);
                writeln!(out, "{}", ERROR_TOKEN)?;
                out.flush()?;
                Ok(false)
            }
        }
    }

    /// Run a raw request, returning the complete response
    pub fn handle(&mut self, line: &str, remote_addr: &str) -> Result<Vec<u8>, NetskelError> {
        let session = Session::parse(line, remote_addr)?;
        let mut response = Vec::new();
        self.dispatch(&session, &mut response)?;
        Ok(response)
    }

    /// Run a parsed request
    pub fn dispatch(&mut self, session: &Session, out: &mut dyn Write) -> Result<(), NetskelError> {
        let kind = session.request.kind;
        tracing::debug!("Launched {} for {}", kind, session.describe());

        self.heartbeat(session)?;

        match kind {
            CommandKind::AddKey => {
                KeyIssuer::from_config(self.config, self.server_name.as_str()).issue(
                    &mut *self.store,
                    session,
                    out,
                )?;
            }
            CommandKind::Manifest => self.send_manifest(session, out)?,
            CommandKind::SendHex | CommandKind::SendBase64 => {
                let path = session.request.path.as_deref().unwrap_or_default();
                send_file(self.config, path, encoding_for(kind), out)?;
            }
            CommandKind::SendRaw => {
                send_file(self.config, SELF_REQUEST_PATH, Encoding::Raw, out)?;
            }
            CommandKind::Uname => {}
            CommandKind::Fingerprint => {
                let token = session.request.path.as_deref().unwrap_or_default();
                let path = resolve_request_path(self.config, token)?;
                let hash = file_fingerprint(&path).map_err(|e| NetskelError::file(&path, e))?;
                writeln!(out, "{}", hash)?;
            }
        }

        tracing::info!("Served {} to {}", kind, session.describe());
        Ok(())
    }

    fn heartbeat(&mut self, session: &Session) -> Result<(), NetskelError> {
        let kind = session.request.kind;
        if kind.identity_policy() == IdentityPolicy::None {
            return Ok(());
        }
        let Some(client) = session.client_id() else {
            return Ok(());
        };

        let mut extra = Vec::new();
        if kind == CommandKind::Uname {
            if let Some(rest) = session.request.rest.as_deref() {
                extra.push((fields::UNAME, rest));
            }
        }

        record_heartbeat(&mut *self.store, client, session, current_time_secs(), &extra)?;
        Ok(())
    }

    fn send_manifest(&self, session: &Session, out: &mut dyn Write) -> Result<(), NetskelError> {
        let mut listing = Vec::new();
        let count = ManifestGenerator::from_config(self.config).write_to(&mut listing)?;

        write!(
            out,
            "#\n# .netskeldb for {} at {}\n#\n# Generated {} by {}\n#\n",
            session.request.identity,
            session.remote_addr,
            format_header_time(&Utc::now()),
            self.server_name
        )?;
        out.write_all(&listing)?;

        tracing::debug!("Listed {} manifest entries", count);
        Ok(())
    }
}

fn encoding_for(kind: CommandKind) -> Encoding {
    Encoding::for_command(kind).unwrap_or(Encoding::Raw)
}
