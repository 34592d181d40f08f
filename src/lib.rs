//! Empty Directory Keeper Library
//!
//! Version-control tools do not track empty directories. This library walks a
//! directory tree with a pluggable [`Visitor`] that decides, per directory and
//! file, whether to descend and whether to keep walking. The walker breaks
//! symbolic-link cycles using canonical path identity and can record which
//! nodes it visited. Marker placement is built on top of the walker in
//! [`services::marker`].

pub mod cli;
pub mod models;
pub mod services;

pub use models::{ErrorItem, MarkerAction, MarkerActionKind, Node, NodeKind, WalkEvent, WalkSummary};
pub use services::platform::PlatformKind;
pub use services::walk::{Descend, Flow, Visitor, WalkContext, Walker};

use serde::{Deserialize, Serialize};
use services::platform::FileSystem;
use std::path::{Path, PathBuf};
use std::result;
use std::sync::Arc;

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    /// A directory's children could not be listed.
    Enumeration {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A symbolic link target could not be determined.
    Unresolvable {
        path: PathBuf,
        reason: String,
    },
    PartialFailure {
        completed: usize,
        failed: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Enumeration { path, source } => {
                write!(f, "Cannot list directory {}: {source}", path.display())
            }
            Error::Unresolvable { path, reason } => {
                write!(f, "Cannot resolve symbolic link {}: {reason}", path.display())
            }
            Error::PartialFailure { completed, failed } => {
                write!(f, "Partial failure: {completed} completed, {failed} failed")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) | Error::Enumeration { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Options governing a single walk.
///
/// The configuration is fixed for the duration of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub follow_symlinks: bool,
    pub visit_files: bool,
    pub track_visited_files: bool,
    pub track_visited_directories: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            visit_files: true,
            track_visited_files: false,
            track_visited_directories: false,
        }
    }
}

/// Walk a tree and return a summary
///
/// # Arguments
/// * `root` - The directory (or file) to start from
/// * `config` - Walk configuration
/// * `visitor` - Policy invoked for every node; pass `&mut visitor` to keep ownership
/// * `platform` - Filesystem backend, usually [`services::platform::for_host`]
///
/// # Returns
/// A [`WalkSummary`] telling whether the walk completed and, when tracking is
/// enabled, which canonical paths were visited. Filesystem failures are
/// returned as errors, distinct from a visitor-driven abort.
pub fn walk_summary<P: AsRef<Path>, V: Visitor>(
    root: P,
    config: &WalkConfig,
    visitor: V,
    platform: Arc<dyn FileSystem>,
) -> Result<WalkSummary> {
    let root = root.as_ref();
    let platform_kind = platform.kind();

    let mut walker = Walker::with_platform(*config, visitor, platform);
    let completed = walker.walk(root)?;

    Ok(WalkSummary {
        root: services::canonical::normalize_path(root),
        platform: platform_kind.to_string(),
        completed,
        config: *config,
        visited_directories: walker
            .visited_directories()
            .iter()
            .map(|p| services::canonical::normalize_path(p))
            .collect(),
        visited_files: walker
            .visited_files()
            .iter()
            .map(|p| services::canonical::normalize_path(p))
            .collect(),
    })
}
