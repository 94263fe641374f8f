//! Deployment manifest generation
//!
//! The manifest always starts with the self-update binary, then lists the
//! deployment root depth-first in byte order, pruning `.git` at every level.
//! Only directories and regular files are listed; symlinks are not followed.
//!
//! File hashes are MD5. They detect that content changed between two
//! listings and nothing more: MD5 gives no integrity or authenticity
//! guarantee and must not be relied on for either.

use md5::{Digest, Md5};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use netskel_core::config::ServerConfig;
use netskel_core::NetskelError;
use netskel_protocol::{FileMode, ManifestEntry};

/// Directory name skipped at every depth
pub const PRUNED_DIR: &str = ".git";

/// Manifest path of the synthetic self-update directory
pub const SELF_DIR_ENTRY: &str = "bin";

/// Manifest path of the synthetic self-update binary
pub const SELF_FILE_ENTRY: &str = "bin/netskel";

/// Builds the manifest for one request
#[derive(Debug, Clone)]
pub struct ManifestGenerator {
    root: PathBuf,
    self_binary: PathBuf,
}

impl ManifestGenerator {
    /// Generator over `root`, advertising `self_binary` as the self entry
    pub fn new(root: impl Into<PathBuf>, self_binary: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            self_binary: self_binary.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.deploy_root(), config.client_binary_path())
    }

    /// Compute every manifest entry
    ///
    /// Fails only when the deployment root itself cannot be read; any other
    /// unreadable entry is logged and left out.
    pub fn generate(&self) -> Result<Vec<ManifestEntry>, NetskelError> {
        fs::read_dir(&self.root).map_err(|e| NetskelError::file(&self.root, e))?;

        let mut entries = vec![ManifestEntry::Directory {
            path: SELF_DIR_ENTRY.to_string(),
        }];
        match file_entry(&self.self_binary, SELF_FILE_ENTRY.to_string()) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("Error reading self binary {:?}: {}", self.self_binary, e),
        }

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != PRUNED_DIR);

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error walking {:?}: {}", self.root, e);
                    continue;
                }
            };

            let path = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => manifest_path(relative),
                Err(_) => continue,
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                entries.push(ManifestEntry::Directory { path });
            } else if file_type.is_file() {
                match file_entry(entry.path(), path) {
                    Ok(file) => entries.push(file),
                    Err(e) => tracing::warn!("Error reading {:?}: {}", entry.path(), e),
                }
            } else {
                tracing::debug!("Skipping {:?}: not a regular file", entry.path());
            }
        }

        Ok(entries)
    }

    /// Generate and write the manifest, one entry per line
    ///
    /// Nothing is written unless generation succeeds.
    pub fn write_to(&self, out: &mut dyn Write) -> Result<usize, NetskelError> {
        let entries = self.generate()?;
        for entry in &entries {
            writeln!(out, "{}", entry)?;
        }
        Ok(entries.len())
    }
}

/// Lowercase hex MD5 of a file's contents
pub fn file_fingerprint(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

fn file_entry(disk_path: &Path, path: String) -> io::Result<ManifestEntry> {
    let metadata = fs::metadata(disk_path)?;
    let hash = file_fingerprint(disk_path)?;

    Ok(ManifestEntry::File {
        path,
        mode: file_mode(&metadata),
        size: metadata.len(),
        hash,
    })
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> FileMode {
    use std::os::unix::fs::PermissionsExt;
    FileMode::from_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn file_mode(_metadata: &fs::Metadata) -> FileMode {
    FileMode::Regular
}

fn manifest_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
