//! Visitor contract driven by the walker.

use super::visited::VisitedTracker;
use crate::WalkConfig;
use crate::models::{Node, NodeKind};
use crate::services::canonical::CanonicalPathResolver;
use std::path::{Path, PathBuf};

/// Answer to [`Visitor::pre_visit`]: descend into the directory or prune it.
///
/// Pruning skips one subtree; the walk continues with siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Into,
    Prune,
}

impl Descend {
    #[must_use]
    pub fn is_into(self) -> bool {
        self == Descend::Into
    }
}

impl From<bool> for Descend {
    fn from(descend: bool) -> Self {
        if descend { Descend::Into } else { Descend::Prune }
    }
}

/// Answer to [`Visitor::visit`] and [`Visitor::post_visit`]: keep walking or
/// abort the whole walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

impl Flow {
    #[must_use]
    pub fn is_continue(self) -> bool {
        self == Flow::Continue
    }

    /// `Continue` only if both are `Continue`.
    #[must_use]
    pub fn and(self, other: Flow) -> Flow {
        if self.is_continue() { other } else { Flow::Abort }
    }
}

impl From<bool> for Flow {
    fn from(keep_going: bool) -> Self {
        if keep_going { Flow::Continue } else { Flow::Abort }
    }
}

/// Read-only view of the walk handed to every visitor callback.
#[derive(Debug, Clone, Copy)]
pub struct WalkContext<'a> {
    config: &'a WalkConfig,
    visited: &'a VisitedTracker,
    resolver: &'a CanonicalPathResolver,
    depth: usize,
}

impl<'a> WalkContext<'a> {
    pub(crate) fn new(
        config: &'a WalkConfig,
        visited: &'a VisitedTracker,
        resolver: &'a CanonicalPathResolver,
        depth: usize,
    ) -> Self {
        Self {
            config,
            visited,
            resolver,
            depth,
        }
    }

    #[must_use]
    pub fn config(&self) -> &'a WalkConfig {
        self.config
    }

    /// Distance from the walk root; the root itself is at depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn canonicalize(&self, path: &Path) -> PathBuf {
        self.resolver.canonicalize(path)
    }

    /// Whether `path` (any spelling) has been visited so far in this walk.
    #[must_use]
    pub fn is_visited(&self, kind: NodeKind, path: &Path) -> bool {
        self.visited.is_visited(kind, &self.resolver.canonicalize(path))
    }

    #[must_use]
    pub fn visited_directories(&self) -> &'a [PathBuf] {
        self.visited.visited_directories()
    }

    #[must_use]
    pub fn visited_files(&self) -> &'a [PathBuf] {
        self.visited.visited_files()
    }
}

/// Caller-supplied policy invoked at each node of the walk.
pub trait Visitor {
    /// Called before a directory's children; `Prune` skips this subtree only.
    fn pre_visit(&mut self, ctx: &WalkContext<'_>, dir: &Node) -> Descend;

    /// Called for each file; `Abort` stops the entire walk.
    fn visit(&mut self, ctx: &WalkContext<'_>, file: &Node) -> Flow;

    /// Called after all children of a directory that was descended into;
    /// `Abort` stops the entire walk.
    fn post_visit(&mut self, ctx: &WalkContext<'_>, dir: &Node) -> Flow;
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn pre_visit(&mut self, ctx: &WalkContext<'_>, dir: &Node) -> Descend {
        (**self).pre_visit(ctx, dir)
    }

    fn visit(&mut self, ctx: &WalkContext<'_>, file: &Node) -> Flow {
        (**self).visit(ctx, file)
    }

    fn post_visit(&mut self, ctx: &WalkContext<'_>, dir: &Node) -> Flow {
        (**self).post_visit(ctx, dir)
    }
}

impl<V: Visitor + ?Sized> Visitor for Box<V> {
    fn pre_visit(&mut self, ctx: &WalkContext<'_>, dir: &Node) -> Descend {
        (**self).pre_visit(ctx, dir)
    }

    fn visit(&mut self, ctx: &WalkContext<'_>, file: &Node) -> Flow {
        (**self).visit(ctx, file)
    }

    fn post_visit(&mut self, ctx: &WalkContext<'_>, dir: &Node) -> Flow {
        (**self).post_visit(ctx, dir)
    }
}
