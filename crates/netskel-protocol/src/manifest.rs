//! Manifest line format
//!
//! The manifest is a tab-separated listing the client uses to decide which
//! files to fetch. Directory lines end the path with `/` and carry no size
//! or hash:
//!
//! ```text
//! bin/<TAB>700<TAB>*
//! bin/netskel<TAB>700<TAB>*<TAB>18234<TAB>0cc175b9c0f1b6a831c399e269772661
//! ```
//!
//! The hash is MD5. It exists to detect that content changed and gives no
//! integrity or authenticity guarantee; do not rely on it for either.

use std::fmt;

/// Mode written for every directory entry
pub const DIRECTORY_MODE: &str = "700";

/// Permission class advertised for a file
///
/// Real permission bits are never published; the client only learns
/// whether to make the file executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Executable,
    Regular,
}

impl FileMode {
    /// Classify raw Unix permission bits
    pub fn from_permissions(mode: u32) -> Self {
        if mode & 0o111 != 0 {
            FileMode::Executable
        } else {
            FileMode::Regular
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileMode::Executable => write!(f, "700"),
            FileMode::Regular => write!(f, "600"),
        }
    }
}

/// One line of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    Directory {
        path: String,
    },
    File {
        path: String,
        mode: FileMode,
        size: u64,
        /// Lowercase hex MD5 of the contents
        hash: String,
    },
}

impl ManifestEntry {
    /// Path relative to the deployment root, without trailing slash
    pub fn path(&self) -> &str {
        match self {
            ManifestEntry::Directory { path } | ManifestEntry::File { path, .. } => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, ManifestEntry::Directory { .. })
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestEntry::Directory { path } => {
                write!(f, "{}/\t{}\t*", path, DIRECTORY_MODE)
            }
            ManifestEntry::File {
                path,
                mode,
                size,
                hash,
            } => write!(f, "{}\t{}\t*\t{}\t{}", path, mode, size, hash),
        }
    }
}
