//! Canonical path identity for visited-set bookkeeping.
//!
//! A canonical path is absolute, free of `.`/`..` components and trailing
//! separators, and has every symbolic link in its *parent* chain resolved. The
//! final component is kept as spelled so a link and the directory it points at
//! stay distinct until the walker explicitly resolves the link.

use super::platform::FileSystem;
use crate::Result;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Normalize path for cross-platform display
/// On Windows: Convert backslashes to forward slashes for consistency
/// On Unix: Use path as-is (backslash is a valid filename character)
#[cfg(windows)]
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    if path_str.contains('\\') {
        path_str.replace('\\', "/")
    } else {
        path_str.into_owned()
    }
}

#[cfg(not(windows))]
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path; leading `..`
/// components of a relative path are preserved.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    normalized.pop();
                    depth -= 1;
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            Component::Normal(name) => {
                normalized.push(name);
                depth += 1;
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(Component::CurDir);
    }
    normalized
}

/// Turn `path` into an absolute, lexically normalized path.
#[must_use]
pub fn make_absolute(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|err| {
        log::trace!("Cannot make {} absolute: {err}", path.display());
        path.to_path_buf()
    });
    normalize_lexically(&absolute)
}

/// Produces canonical identity keys using an injected platform backend.
#[derive(Clone)]
pub struct CanonicalPathResolver {
    platform: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for CanonicalPathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalPathResolver")
            .field("platform", &self.platform.kind())
            .finish()
    }
}

impl CanonicalPathResolver {
    #[must_use]
    pub fn new(platform: Arc<dyn FileSystem>) -> Self {
        Self { platform }
    }

    #[must_use]
    pub fn platform(&self) -> &dyn FileSystem {
        self.platform.as_ref()
    }

    /// Canonical identity of the node at `path`.
    ///
    /// Any two spellings of the same node (relative or absolute, with or
    /// without a trailing separator, through a linked parent or not) map to
    /// the same key. Falls back to the lexical form when the parent cannot be
    /// resolved physically.
    #[must_use]
    pub fn canonicalize(&self, path: &Path) -> PathBuf {
        let trimmed: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();

        let physical = match trimmed.components().next_back() {
            Some(Component::Normal(name)) => {
                let parent = trimmed
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                self.platform.real_path(parent).map(|real| real.join(name))
            }
            Some(Component::ParentDir) => self.platform.real_path(&trimmed),
            None => self.platform.real_path(Path::new(".")),
            _ => return make_absolute(&trimmed),
        };

        match physical {
            Ok(resolved) => normalize_lexically(&resolved),
            Err(err) => {
                log::trace!(
                    "Falling back to lexical canonical path for {}: {err}",
                    path.display()
                );
                make_absolute(&trimmed)
            }
        }
    }

    /// Canonical path of the node a symbolic link points at.
    ///
    /// A relative target is resolved against the link's parent directory. An
    /// existing target is resolved fully, so a chain of links ends at the
    /// physical directory; a missing one keeps its final component.
    /// Fails with [`crate::Error::Unresolvable`] when the link cannot be read.
    pub fn resolve_link_target(&self, link: &Path) -> Result<PathBuf> {
        let target = self.platform.symbolic_link_target(link)?;

        let joined = if target.is_absolute() {
            target
        } else {
            let parent = link
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let base = self
                .platform
                .real_path(parent)
                .unwrap_or_else(|_| make_absolute(parent));
            base.join(target)
        };

        match self.platform.real_path(&joined) {
            Ok(real) => Ok(normalize_lexically(&real)),
            Err(err) => {
                log::trace!("Link target {} not resolvable: {err}", joined.display());
                Ok(self.canonicalize(&normalize_lexically(&joined)))
            }
        }
    }
}
