//! File transfer encodings
//!
//! A requested file is read completely before anything is written, so a
//! failed read never leaves a partial response on the channel.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use netskel_core::config::ServerConfig;
use netskel_core::NetskelError;
use netskel_protocol::{CommandKind, DEPLOY_DIR, SELF_REQUEST_PATH};

/// Bytes per hex line (30 encoded characters)
pub const HEX_LINE_BYTES: usize = 15;

/// Bytes per base64 line (76 encoded characters)
pub const BASE64_LINE_BYTES: usize = 57;

/// How file contents are put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Verbatim bytes
    Raw,
    /// Lowercase hex, wrapped
    Hex,
    /// Standard base64 with padding, wrapped
    Base64,
}

impl Encoding {
    /// Encoding used by a file-sending command
    pub fn for_command(kind: CommandKind) -> Option<Self> {
        match kind {
            CommandKind::SendRaw => Some(Encoding::Raw),
            CommandKind::SendHex => Some(Encoding::Hex),
            CommandKind::SendBase64 => Some(Encoding::Base64),
            _ => None,
        }
    }

    /// Write `data` to `out` in this encoding
    ///
    /// Wrapped encodings end every line with `\n`; empty input produces a
    /// single `\n`.
    pub fn encode(&self, data: &[u8], out: &mut dyn Write) -> io::Result<()> {
        match self {
            Encoding::Raw => out.write_all(data),
            Encoding::Hex => write_wrapped(data, HEX_LINE_BYTES, out, |chunk| hex::encode(chunk)),
            Encoding::Base64 => {
                write_wrapped(data, BASE64_LINE_BYTES, out, |chunk| STANDARD.encode(chunk))
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Raw => write!(f, "raw"),
            Encoding::Hex => write!(f, "hex"),
            Encoding::Base64 => write!(f, "base64"),
        }
    }
}

fn write_wrapped(
    data: &[u8],
    line_bytes: usize,
    out: &mut dyn Write,
    encode: impl Fn(&[u8]) -> String,
) -> io::Result<()> {
    if data.is_empty() {
        return out.write_all(b"\n");
    }
    for chunk in data.chunks(line_bytes) {
        out.write_all(encode(chunk).as_bytes())?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Map a client path token to a file on disk
///
/// The self-update token maps to the configured client binary. Anything
/// else must be a plain relative path under the deployment directory.
pub fn resolve_request_path(config: &ServerConfig, token: &str) -> Result<PathBuf, NetskelError> {
    if token == SELF_REQUEST_PATH {
        return Ok(config.client_binary_path());
    }

    let requested = Path::new(token);
    let mut components = requested.components();
    let in_deploy_dir = matches!(
        components.next(),
        Some(Component::Normal(first)) if first == OsStr::new(DEPLOY_DIR)
    );
    let plain = components.all(|c| matches!(c, Component::Normal(_)));

    if !in_deploy_dir || !plain || requested.components().count() < 2 {
        return Err(outside_root(requested));
    }

    // Links inside the deployment directory could point anywhere on the host.
    let mut current = config.base_dir.join(DEPLOY_DIR);
    for component in requested.components().skip(1) {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => return Err(outside_root(requested)),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => return Err(NetskelError::file(&current, e)),
        }
    }

    Ok(config.base_dir.join(requested))
}

fn outside_root(requested: &Path) -> NetskelError {
    NetskelError::file(
        requested,
        io::Error::new(
            io::ErrorKind::PermissionDenied,
            "path is outside the deployment root",
        ),
    )
}

/// Read a requested file and write it to `out` in `encoding`
///
/// Returns the number of source bytes sent.
pub fn send_file(
    config: &ServerConfig,
    token: &str,
    encoding: Encoding,
    out: &mut dyn Write,
) -> Result<usize, NetskelError> {
    let path = resolve_request_path(config, token)?;
    let data = read_file(&path)?;

    encoding.encode(&data, out)?;
    tracing::debug!("Sent {:?} ({} bytes, {})", path, data.len(), encoding);
    Ok(data.len())
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, NetskelError> {
    fs::read(path).map_err(|e| NetskelError::file(path, e))
}
