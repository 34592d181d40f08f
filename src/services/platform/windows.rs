//! Windows backend treating every reparse point (symbolic links and
//! junctions) as a link.

use super::{FileSystem, Listing, PlatformKind, portable};
use crate::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(windows)]
use std::os::windows::fs::MetadataExt;
#[cfg(windows)]
use windows_sys::Win32::Storage::FileSystem::FILE_ATTRIBUTE_REPARSE_POINT;

/// Windows filesystem backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsFileSystem;

impl WindowsFileSystem {
    #[must_use]
    pub fn is_supported() -> bool {
        cfg!(windows)
    }
}

#[cfg(windows)]
fn is_reparse_point(metadata: &fs::Metadata) -> bool {
    metadata.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
}

#[cfg(not(windows))]
fn is_reparse_point(metadata: &fs::Metadata) -> bool {
    metadata.file_type().is_symlink()
}

impl FileSystem for WindowsFileSystem {
    fn kind(&self) -> PlatformKind {
        if Self::is_supported() {
            PlatformKind::Windows
        } else {
            PlatformKind::Portable
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|m| is_reparse_point(&m))
    }

    fn symbolic_link_target(&self, path: &Path) -> Result<PathBuf> {
        portable::read_link_target(path)
    }

    fn list_children(&self, path: &Path) -> io::Result<Listing> {
        portable::read_listing(path, is_reparse_point)
    }
}
