//! Portable backend using standard library primitives.
//! Serves as the fallback when no platform-specific backend is available and
//! provides the shared directory listing used by the Windows backend.

use super::{FileSystem, Listing, PlatformKind};
use crate::models::Node;
use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Standard library backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableFileSystem;

impl FileSystem for PortableFileSystem {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Portable
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
    }

    fn symbolic_link_target(&self, path: &Path) -> Result<PathBuf> {
        read_link_target(path)
    }

    fn list_children(&self, path: &Path) -> io::Result<Listing> {
        read_listing(path, |m| m.file_type().is_symlink())
    }
}

pub(crate) fn read_link_target(path: &Path) -> Result<PathBuf> {
    fs::read_link(path).map_err(|err| Error::Unresolvable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Read the children of `dir` in one pass, sorted by name.
///
/// `is_link` inspects the entry's own (non-followed) metadata.
pub(crate) fn read_listing<F>(dir: &Path, is_link: F) -> io::Result<Listing>
where
    F: Fn(&fs::Metadata) -> bool,
{
    let mut listing = Listing::default();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();

        let link_metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("Entry vanished during listing: {}", entry_path.display());
                continue;
            }
            Err(err) => return Err(err),
        };

        let is_symlink = is_link(&link_metadata);
        let metadata = if is_symlink {
            match fs::metadata(&entry_path) {
                Ok(m) => m,
                Err(err) => {
                    log::debug!("Skipping dangling link {}: {err}", entry_path.display());
                    continue;
                }
            }
        } else {
            link_metadata
        };

        let node = if metadata.is_dir() {
            Node::directory(entry_path, is_symlink)
        } else if metadata.is_file() {
            Node::file(entry_path)
        } else {
            log::debug!("Skipping special file {}", entry_path.display());
            continue;
        };

        listing.push(node);
    }

    Ok(listing.sorted())
}
