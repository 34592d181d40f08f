//! Depth-first traversal engine.
//!
//! The walker drives a [`Visitor`] over a directory tree that may contain
//! symbolic-link cycles. Invariants:
//!
//! - Subdirectories of a directory are walked (fully) before its files.
//! - `Descend::Prune` skips one subtree; `Flow::Abort` unwinds the whole walk
//!   and no callback fires afterwards, including enclosing `post_visit`s.
//! - A directory key, canonical or link-resolved, is handed to the visitor at
//!   most once per walk.
//! - Filesystem failures surface as `Err`, never as an aborted walk.

pub mod visited;
pub mod visitor;

pub use visited::{VisitedSet, VisitedTracker};
pub use visitor::{Descend, Flow, Visitor, WalkContext};

use crate::models::{Node, NodeKind};
use crate::services::canonical::CanonicalPathResolver;
use crate::services::platform::{self, FileSystem};
use crate::{Error, Result, WalkConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recursive walker owning its visitor and per-walk state.
///
/// One walker serves one walk at a time; concurrent walks need separate
/// walkers.
#[derive(Debug)]
pub struct Walker<V> {
    config: WalkConfig,
    visitor: V,
    resolver: CanonicalPathResolver,
    visited: VisitedTracker,
}

impl<V: Visitor> Walker<V> {
    /// Walker using the preferred platform backend of the host.
    #[must_use]
    pub fn new(config: WalkConfig, visitor: V) -> Self {
        Self::with_platform(config, visitor, platform::for_host())
    }

    #[must_use]
    pub fn with_platform(config: WalkConfig, visitor: V, platform: Arc<dyn FileSystem>) -> Self {
        Self {
            config,
            visitor,
            resolver: CanonicalPathResolver::new(platform),
            visited: VisitedTracker::new(&config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    #[must_use]
    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    #[must_use]
    pub fn into_visitor(self) -> V {
        self.visitor
    }

    /// Canonical directories visited by the last walk, in visiting order.
    ///
    /// Empty unless `track_visited_directories` is set.
    #[must_use]
    pub fn visited_directories(&self) -> &[PathBuf] {
        self.visited.visited_directories()
    }

    /// Canonical files visited by the last walk, in visiting order.
    ///
    /// Empty unless `track_visited_files` is set.
    #[must_use]
    pub fn visited_files(&self) -> &[PathBuf] {
        self.visited.visited_files()
    }

    /// Walk the tree rooted at `root`.
    ///
    /// Returns `Ok(true)` when the walk ran to completion and `Ok(false)` when
    /// a visitor aborted it or `root` does not exist. Directory enumeration
    /// failures are returned as [`Error::Enumeration`].
    pub fn walk<P: AsRef<Path>>(&mut self, root: P) -> Result<bool> {
        let root = root.as_ref();
        let platform = self.resolver.platform();

        // A missing root classifies as a file; `walk_node` reports it.
        let node = if platform.is_directory(root) {
            Node::directory(root, platform.is_symbolic_link(root))
        } else {
            Node::file(root)
        };

        self.walk_node(&node)
    }

    /// Walk starting from an already classified node.
    pub fn walk_node(&mut self, root: &Node) -> Result<bool> {
        self.visited = VisitedTracker::new(&self.config);

        if !self.resolver.platform().exists(root.path()) {
            log::warn!("Walk root does not exist: {}", root.path().display());
            return Ok(false);
        }

        log::debug!(
            "Walking {} (follow_symlinks={}, visit_files={}, platform={})",
            root.path().display(),
            self.config.follow_symlinks,
            self.config.visit_files,
            self.resolver.platform().kind(),
        );

        let flow = match root {
            Node::Directory { .. } => self.walk_directory(root, 0)?,
            Node::File { .. } => self.walk_file(root, 0),
        };

        if !flow.is_continue() {
            log::debug!("Walk of {} aborted by visitor", root.path().display());
        }
        Ok(flow.is_continue())
    }

    fn walk_directory(&mut self, dir: &Node, depth: usize) -> Result<Flow> {
        let path = dir.path();
        let key = self.resolver.canonicalize(path);

        if self.visited.is_visited(NodeKind::Directory, &key) {
            log::debug!("Already visited, skipping: {}", path.display());
            return Ok(Flow::Continue);
        }

        let mut target_key = None;
        if dir.is_symlink() {
            if !self.config.follow_symlinks {
                log::trace!("Not following symbolic link: {}", path.display());
                self.visited.mark_visited(NodeKind::Directory, &key);
                return Ok(Flow::Continue);
            }

            match self.resolver.resolve_link_target(path) {
                Ok(target) if self.visited.is_visited(NodeKind::Directory, &target) => {
                    log::debug!(
                        "Symbolic link cycle avoided: {} -> {}",
                        path.display(),
                        target.display()
                    );
                    self.visited.mark_visited(NodeKind::Directory, &key);
                    return Ok(Flow::Continue);
                }
                Ok(target) => target_key = Some(target),
                Err(err) => {
                    log::debug!("{err}; treating as unfollowable");
                    self.visited.mark_visited(NodeKind::Directory, &key);
                    return Ok(Flow::Continue);
                }
            }
        }

        let ctx = WalkContext::new(&self.config, &self.visited, &self.resolver, depth);
        if !self.visitor.pre_visit(&ctx, dir).is_into() {
            log::trace!("Pruned: {}", path.display());
            return Ok(Flow::Continue);
        }

        self.visited.mark_visited(NodeKind::Directory, &key);
        if let Some(target) = &target_key {
            self.visited.mark_visited(NodeKind::Directory, target);
        }

        let listing = self
            .resolver
            .platform()
            .list_children(path)
            .map_err(|source| Error::Enumeration {
                path: path.to_path_buf(),
                source,
            })?;

        let mut flow = Flow::Continue;
        for subdirectory in &listing.directories {
            flow = self.walk_directory(subdirectory, depth + 1)?;
            if !flow.is_continue() {
                break;
            }
        }

        if self.config.visit_files && flow.is_continue() {
            for file in &listing.files {
                flow = self.walk_file(file, depth + 1);
                if !flow.is_continue() {
                    break;
                }
            }
        }

        if !flow.is_continue() {
            return Ok(Flow::Abort);
        }

        let ctx = WalkContext::new(&self.config, &self.visited, &self.resolver, depth);
        Ok(self.visitor.post_visit(&ctx, dir).and(flow))
    }

    fn walk_file(&mut self, file: &Node, depth: usize) -> Flow {
        let key = if self.config.track_visited_files {
            let key = self.resolver.canonicalize(file.path());
            if self.visited.is_visited(NodeKind::File, &key) {
                log::debug!("Already visited, skipping: {}", file.path().display());
                return Flow::Continue;
            }
            Some(key)
        } else {
            None
        };

        let ctx = WalkContext::new(&self.config, &self.visited, &self.resolver, depth);
        let flow = self.visitor.visit(&ctx, file);

        if let Some(key) = key {
            self.visited.mark_visited(NodeKind::File, &key);
        }
        flow
    }
}
