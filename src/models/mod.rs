//! Data models for walked nodes, walk summaries, marker actions, and errors

use crate::WalkConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of a filesystem node, used to select the visited set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

/// A filesystem node as seen by the walker.
///
/// A symbolic link pointing at a directory is a `Directory` with
/// `is_symlink` set. Its target is resolved only when the walker needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory { path: PathBuf, is_symlink: bool },
    File { path: PathBuf },
}

impl Node {
    #[must_use]
    pub fn directory<P: Into<PathBuf>>(path: P, is_symlink: bool) -> Self {
        Node::Directory {
            path: path.into(),
            is_symlink,
        }
    }

    #[must_use]
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Node::File { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Node::Directory { path, .. } | Node::File { path } => path,
        }
    }

    /// Final path component, or the whole path when there is none (e.g. `/`).
    #[must_use]
    pub fn name(&self) -> String {
        let path = self.path();
        path.file_name()
            .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
            .into_owned()
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory { .. } => NodeKind::Directory,
            Node::File { .. } => NodeKind::File,
        }
    }

    #[must_use]
    pub fn is_symlink(&self) -> bool {
        matches!(self, Node::Directory { is_symlink: true, .. })
    }
}

/// Result of one walk, suitable for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkSummary {
    pub root: String,
    pub platform: String,
    pub completed: bool,
    pub config: WalkConfig,
    pub visited_directories: Vec<String>,
    pub visited_files: Vec<String>,
}

/// One visitor callback observed during a walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "path", rename_all = "snake_case")]
pub enum WalkEvent {
    PreVisit(String),
    Visit(String),
    PostVisit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerActionKind {
    Created,
    Removed,
}

/// A marker file created or removed (or planned, in dry-run mode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerAction {
    pub path: String,
    pub kind: MarkerActionKind,
}

/// Represents an error encountered while mutating a marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}

impl ErrorItem {
    #[must_use]
    pub fn from_io(path: &Path, error: &std::io::Error) -> Self {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => "ENOENT",
            std::io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };

        Self {
            path: path.to_string_lossy().to_string(),
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}
