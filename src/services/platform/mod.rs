//! Platform primitives consumed by the walker.
//!
//! The walker never touches the filesystem directly. It asks a [`FileSystem`]
//! capability object, selected once by the embedding application, to classify
//! nodes, list children, and read symbolic link targets:
//!
//! - Listings MUST be stable for one call; every backend sorts by file name.
//! - A symlink to a directory is listed as a directory node flagged as a link.
//! - Dangling links and special files are skipped, never reported as errors.

pub mod detect;
pub mod portable;
pub mod posix;
pub mod windows;

use crate::Result;
use crate::models::Node;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Children of one directory from a single read, split by kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Directories, including symlinks to directories, sorted by name.
    pub directories: Vec<Node>,
    /// Files, including symlinks to files, sorted by name.
    pub files: Vec<Node>,
}

impl Listing {
    /// Sort both halves by file name and return the listing.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.directories
            .sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));
        self.files
            .sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));
        self
    }

    pub(crate) fn push(&mut self, node: Node) {
        match node {
            Node::Directory { .. } => self.directories.push(node),
            Node::File { .. } => self.files.push(node),
        }
    }
}

/// Enumeration of available platform backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformKind {
    /// Standard library primitives; available everywhere.
    #[default]
    Portable,
    /// `openat`/`getdents64`/`readlink` through `rustix`.
    Posix,
    /// Reparse-point aware primitives for NTFS.
    Windows,
}

impl PlatformKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Portable => "portable",
            PlatformKind::Posix => "posix",
            PlatformKind::Windows => "windows",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "portable" | "std" => Some(PlatformKind::Portable),
            "posix" | "unix" => Some(PlatformKind::Posix),
            "windows" | "win" => Some(PlatformKind::Windows),
            _ => None,
        }
    }

    /// Whether this backend can run on the current host.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        match self {
            PlatformKind::Portable => true,
            PlatformKind::Posix => posix::PosixFileSystem::is_supported(),
            PlatformKind::Windows => windows::WindowsFileSystem::is_supported(),
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PlatformKind::from_label(s).ok_or_else(|| format!("unknown platform '{s}'"))
    }
}

/// Filesystem primitives the walker depends on.
pub trait FileSystem: Send + Sync {
    /// Identify the backend for logging and reports.
    fn kind(&self) -> PlatformKind;

    /// Whether anything exists at `path`, following symbolic links.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory, following symbolic links.
    fn is_directory(&self, path: &Path) -> bool;

    /// Whether `path` itself is a symbolic link (or another kind of reparse point).
    fn is_symbolic_link(&self, path: &Path) -> bool;

    /// Raw target text stored in the link at `path`.
    ///
    /// Fails with [`crate::Error::Unresolvable`] when the platform cannot answer.
    fn symbolic_link_target(&self, path: &Path) -> Result<PathBuf>;

    /// Read the children of `path` once and split them into directories and files.
    fn list_children(&self, path: &Path) -> io::Result<Listing>;

    /// Directories (including symlinks to directories) directly inside `path`.
    fn list_subdirectories(&self, path: &Path) -> io::Result<Vec<Node>> {
        Ok(self.list_children(path)?.directories)
    }

    /// Files (including symlinks to files) directly inside `path`.
    fn list_files(&self, path: &Path) -> io::Result<Vec<Node>> {
        Ok(self.list_children(path)?.files)
    }

    /// Physical location of an existing path with every link resolved.
    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// Instantiate the backend for `kind`, falling back to the portable backend
/// when the host cannot run it.
#[must_use]
pub fn for_kind(kind: PlatformKind) -> Arc<dyn FileSystem> {
    let resolved = ensure_supported(kind);
    if resolved != kind {
        log::warn!("Requested platform '{kind}' unsupported; falling back to '{resolved}'");
    }

    match resolved {
        PlatformKind::Portable => Arc::new(portable::PortableFileSystem),
        PlatformKind::Posix => Arc::new(posix::PosixFileSystem),
        PlatformKind::Windows => Arc::new(windows::WindowsFileSystem),
    }
}

/// Instantiate the preferred backend for the current host.
#[must_use]
pub fn for_host() -> Arc<dyn FileSystem> {
    for_kind(detect::default_platform())
}

fn ensure_supported(kind: PlatformKind) -> PlatformKind {
    if kind.is_supported() {
        kind
    } else {
        PlatformKind::Portable
    }
}
