//! Marker placement for empty directories.
//!
//! A directory is empty when it holds nothing besides the marker and excluded
//! (pruned) subdirectories. Symbolic links count as content whether or not the
//! walk follows them. The walker itself never mutates anything; all file
//! creation and removal happens here.

use crate::models::{ErrorItem, MarkerAction, MarkerActionKind, Node};
use crate::services::canonical::normalize_path;
use crate::services::platform::FileSystem;
use crate::services::walk::{Descend, Flow, Visitor, WalkContext, Walker};
use crate::{Error, Result, WalkConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_MARKER_NAME: &str = ".emptydir";
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", ".hg", ".svn", "CVS"];

/// Reject marker names that would not land directly inside the directory.
pub fn validate_marker_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::InvalidInput(format!("invalid marker name '{name}'")));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerMode {
    /// Place a marker in every empty directory lacking one.
    #[default]
    Create,
    /// Remove markers from directories that are no longer empty.
    Clean,
    /// Remove every marker.
    Remove,
}

impl MarkerMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerMode::Create => "create",
            MarkerMode::Clean => "clean",
            MarkerMode::Remove => "remove",
        }
    }
}

impl std::fmt::Display for MarkerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a marker run
#[derive(Debug, Clone)]
pub struct MarkerOptions {
    pub mode: MarkerMode,
    pub marker_name: String,
    pub excludes: Vec<String>,
    pub dry_run: bool,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            mode: MarkerMode::Create,
            marker_name: DEFAULT_MARKER_NAME.to_string(),
            excludes: DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect(),
            dry_run: false,
        }
    }
}

/// Outcome of a marker run, suitable for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerReport {
    pub root: String,
    pub mode: MarkerMode,
    pub dry_run: bool,
    pub completed: bool,
    pub directories_scanned: usize,
    pub empty_directories: usize,
    pub actions: Vec<MarkerAction>,
    pub errors: Vec<ErrorItem>,
}

impl MarkerReport {
    /// Turn recorded per-directory failures into an error.
    pub fn ensure_success(&self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::PartialFailure {
                completed: self.actions.len(),
                failed: self.errors.len(),
            })
        }
    }
}

#[derive(Debug)]
struct Frame {
    path: PathBuf,
    entries: usize,
    marker: Option<PathBuf>,
}

/// Visitor that finds empty directories and creates or removes markers.
#[derive(Debug)]
pub struct MarkerVisitor {
    options: MarkerOptions,
    stack: Vec<Frame>,
    directories_scanned: usize,
    empty_directories: usize,
    actions: Vec<MarkerAction>,
    errors: Vec<ErrorItem>,
}

impl MarkerVisitor {
    #[must_use]
    pub fn new(options: MarkerOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            directories_scanned: 0,
            empty_directories: 0,
            actions: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[MarkerAction] {
        &self.actions
    }

    #[must_use]
    pub fn errors(&self) -> &[ErrorItem] {
        &self.errors
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.options.excludes.iter().any(|excluded| excluded == name)
    }

    fn create_marker(&mut self, dir: &Path) {
        let marker = dir.join(&self.options.marker_name);

        if !self.options.dry_run {
            let created = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&marker);
            match created {
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    log::debug!("Marker appeared concurrently: {}", marker.display());
                    return;
                }
                Err(err) => {
                    self.record_error(&marker, &err);
                    return;
                }
            }
        }

        log::info!("Created marker {}", marker.display());
        self.actions.push(MarkerAction {
            path: normalize_path(&marker),
            kind: MarkerActionKind::Created,
        });
    }

    fn remove_marker(&mut self, marker: &Path) {
        if !self.options.dry_run
            && let Err(err) = fs::remove_file(marker)
        {
            self.record_error(marker, &err);
            return;
        }

        log::info!("Removed marker {}", marker.display());
        self.actions.push(MarkerAction {
            path: normalize_path(marker),
            kind: MarkerActionKind::Removed,
        });
    }

    /// Whether `dir` holds entries the walk never handed over: unfollowed or
    /// repeated links, dangling links and special files.
    fn has_unvisited_entries(&self, dir: &Path) -> io::Result<bool> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == self.options.marker_name {
                continue;
            }
            if self.is_excluded(&name) && entry.path().is_dir() {
                continue;
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn record_error(&mut self, path: &Path, error: &io::Error) {
        log::warn!("Marker update failed for {}: {error}", path.display());
        self.errors.push(ErrorItem::from_io(path, error));
    }
}

impl Visitor for MarkerVisitor {
    fn pre_visit(&mut self, ctx: &WalkContext<'_>, dir: &Node) -> Descend {
        if ctx.depth() > 0 && self.is_excluded(&dir.name()) {
            log::debug!("Excluded directory pruned: {}", dir.path().display());
            return Descend::Prune;
        }

        if let Some(parent) = self.stack.last_mut() {
            parent.entries += 1;
        }
        self.stack.push(Frame {
            path: dir.path().to_path_buf(),
            entries: 0,
            marker: None,
        });
        self.directories_scanned += 1;
        Descend::Into
    }

    fn visit(&mut self, _ctx: &WalkContext<'_>, file: &Node) -> Flow {
        if let Some(frame) = self.stack.last_mut() {
            if file.name() == self.options.marker_name {
                frame.marker = Some(file.path().to_path_buf());
            } else {
                frame.entries += 1;
            }
        }
        Flow::Continue
    }

    fn post_visit(&mut self, _ctx: &WalkContext<'_>, _dir: &Node) -> Flow {
        let Some(frame) = self.stack.pop() else {
            return Flow::Continue;
        };

        let mut is_empty = frame.entries == 0;
        if is_empty {
            match self.has_unvisited_entries(&frame.path) {
                Ok(found) => is_empty = !found,
                Err(err) => {
                    self.record_error(&frame.path, &err);
                    is_empty = false;
                }
            }
        }
        if is_empty {
            self.empty_directories += 1;
        }

        match (self.options.mode, frame.marker) {
            (MarkerMode::Create, None) if is_empty => self.create_marker(&frame.path),
            (MarkerMode::Clean, Some(marker)) if !is_empty => self.remove_marker(&marker),
            (MarkerMode::Remove, Some(marker)) => self.remove_marker(&marker),
            _ => {}
        }
        Flow::Continue
    }
}

/// Run marker placement over `root` with the given platform backend.
///
/// Files are always visited, regardless of `config.visit_files`: emptiness
/// cannot be judged without them.
pub fn run_markers<P: AsRef<Path>>(
    root: P,
    options: MarkerOptions,
    config: WalkConfig,
    platform: Arc<dyn FileSystem>,
) -> Result<MarkerReport> {
    let root = root.as_ref();
    validate_marker_name(&options.marker_name)?;
    let config = WalkConfig {
        visit_files: true,
        ..config
    };
    let mode = options.mode;
    let dry_run = options.dry_run;

    let mut walker = Walker::with_platform(config, MarkerVisitor::new(options), platform);
    let completed = walker.walk(root)?;
    let visitor = walker.into_visitor();

    log::debug!(
        "Marker run finished: {} directories, {} empty, {} actions, {} errors",
        visitor.directories_scanned,
        visitor.empty_directories,
        visitor.actions.len(),
        visitor.errors.len(),
    );

    Ok(MarkerReport {
        root: normalize_path(root),
        mode,
        dry_run,
        completed,
        directories_scanned: visitor.directories_scanned,
        empty_directories: visitor.empty_directories,
        actions: visitor.actions,
        errors: visitor.errors,
    })
}
