//! Per-walk record of canonical paths already processed.

use crate::WalkConfig;
use crate::models::NodeKind;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Append-only set of canonical paths that remembers insertion order.
///
/// A disabled set answers "not visited" for everything and never grows.
#[derive(Debug, Default)]
pub struct VisitedSet {
    enabled: bool,
    keys: HashSet<PathBuf>,
    order: Vec<PathBuf>,
}

impl VisitedSet {
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn contains(&self, key: &Path) -> bool {
        self.enabled && self.keys.contains(key)
    }

    /// Insert `key`; returns `true` only when it was newly added.
    pub fn insert(&mut self, key: &Path) -> bool {
        if !self.enabled || self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_path_buf());
        self.order.push(key.to_path_buf());
        true
    }

    /// Keys in the order they were first inserted.
    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Directory and file visited sets for one walk.
///
/// Directory bookkeeping is also switched on, unreported, whenever symbolic
/// links are followed: cycle detection depends on it.
#[derive(Debug, Default)]
pub struct VisitedTracker {
    directories: VisitedSet,
    files: VisitedSet,
    report_directories: bool,
}

impl VisitedTracker {
    #[must_use]
    pub fn new(config: &WalkConfig) -> Self {
        let track_directories = config.track_visited_directories || config.follow_symlinks;
        Self {
            directories: if track_directories {
                VisitedSet::enabled()
            } else {
                VisitedSet::disabled()
            },
            files: if config.track_visited_files {
                VisitedSet::enabled()
            } else {
                VisitedSet::disabled()
            },
            report_directories: config.track_visited_directories,
        }
    }

    fn set(&self, kind: NodeKind) -> &VisitedSet {
        match kind {
            NodeKind::Directory => &self.directories,
            NodeKind::File => &self.files,
        }
    }

    #[must_use]
    pub fn is_visited(&self, kind: NodeKind, key: &Path) -> bool {
        self.set(kind).contains(key)
    }

    /// Record `key`; a no-op when tracking is off for `kind` or the key is known.
    pub fn mark_visited(&mut self, kind: NodeKind, key: &Path) -> bool {
        let inserted = match kind {
            NodeKind::Directory => self.directories.insert(key),
            NodeKind::File => self.files.insert(key),
        };
        if inserted {
            log::trace!("Marked {kind:?} visited: {}", key.display());
        }
        inserted
    }

    /// Visited directories in visiting order; empty unless reporting is on.
    #[must_use]
    pub fn visited_directories(&self) -> &[PathBuf] {
        if self.report_directories {
            self.directories.as_slice()
        } else {
            &[]
        }
    }

    /// Visited files in visiting order; empty unless tracking is on.
    #[must_use]
    pub fn visited_files(&self) -> &[PathBuf] {
        self.files.as_slice()
    }
}
