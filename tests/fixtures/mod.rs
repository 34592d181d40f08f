//! Test fixtures for deterministic walks

#![allow(dead_code)]

use dirkeep::{Descend, Flow, Node, Visitor, WalkContext};
use std::fs;
use std::path::{Path, PathBuf};

/// Create the sample tree used across walk tests:
///
/// ```text
/// t/a/1, t/a/2, t/a/b/3, t/a/b/4, t/c/5, t/c/6
/// ```
pub fn create_sample_tree(base: &Path) -> std::io::Result<PathBuf> {
    let root = base.join("t");
    fs::create_dir_all(root.join("a/b"))?;
    fs::create_dir_all(root.join("c"))?;

    for file in ["a/1", "a/2", "a/b/3", "a/b/4", "c/5", "c/6"] {
        fs::write(root.join(file), file.as_bytes())?;
    }

    Ok(root)
}

/// Full callback sequence expected for the sample tree when nothing prunes or aborts.
pub fn full_sample_sequence() -> Vec<String> {
    [
        "pre t",
        "pre t/a",
        "pre t/a/b",
        "visit t/a/b/3",
        "visit t/a/b/4",
        "post t/a/b",
        "visit t/a/1",
        "visit t/a/2",
        "post t/a",
        "pre t/c",
        "visit t/c/5",
        "visit t/c/6",
        "post t/c",
        "post t",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Visitor recording callbacks as `"<op> <path relative to base>"` lines,
/// with scripted prune and abort points.
#[derive(Debug, Default)]
pub struct ScriptedVisitor {
    base: PathBuf,
    pub events: Vec<String>,
    pub prune: Vec<String>,
    pub abort_on_visit: Option<String>,
    pub abort_on_post: Option<String>,
}

impl ScriptedVisitor {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn pruning(mut self, rel: &str) -> Self {
        self.prune.push(rel.to_string());
        self
    }

    pub fn aborting_on_visit(mut self, rel: &str) -> Self {
        self.abort_on_visit = Some(rel.to_string());
        self
    }

    pub fn aborting_on_post(mut self, rel: &str) -> Self {
        self.abort_on_post = Some(rel.to_string());
        self
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.base)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl Visitor for ScriptedVisitor {
    fn pre_visit(&mut self, _ctx: &WalkContext<'_>, dir: &Node) -> Descend {
        let rel = self.relative(dir.path());
        self.events.push(format!("pre {rel}"));
        Descend::from(!self.prune.contains(&rel))
    }

    fn visit(&mut self, _ctx: &WalkContext<'_>, file: &Node) -> Flow {
        let rel = self.relative(file.path());
        self.events.push(format!("visit {rel}"));
        Flow::from(self.abort_on_visit.as_deref() != Some(rel.as_str()))
    }

    fn post_visit(&mut self, _ctx: &WalkContext<'_>, dir: &Node) -> Flow {
        let rel = self.relative(dir.path());
        self.events.push(format!("post {rel}"));
        Flow::from(self.abort_on_post.as_deref() != Some(rel.as_str()))
    }
}
