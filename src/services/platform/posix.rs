//! POSIX backend built on `rustix` primitives.
//!
//! Directory listings read entries through `openat` + `getdents64` and rely on
//! `d_type`, issuing an `fstatat` only for links and filesystems that report
//! `DT_UNKNOWN`.

use super::{FileSystem, Listing, PlatformKind};
use crate::Result;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(not(unix))]
use super::portable;
#[cfg(unix)]
use crate::Error;
#[cfg(unix)]
use crate::models::Node;
#[cfg(unix)]
use rustix::fs::{self as rfs, AtFlags, Dir, FileType, Mode, OFlags};
#[cfg(unix)]
use std::ffi::OsStr;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;

/// POSIX filesystem backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixFileSystem;

impl PosixFileSystem {
    #[must_use]
    pub fn is_supported() -> bool {
        cfg!(unix)
    }
}

#[cfg(unix)]
impl FileSystem for PosixFileSystem {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Posix
    }

    fn exists(&self, path: &Path) -> bool {
        rfs::statat(rfs::CWD, path, AtFlags::empty()).is_ok()
    }

    fn is_directory(&self, path: &Path) -> bool {
        rfs::statat(rfs::CWD, path, AtFlags::empty())
            .is_ok_and(|stat| FileType::from_raw_mode(stat.st_mode) == FileType::Directory)
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        rfs::statat(rfs::CWD, path, AtFlags::SYMLINK_NOFOLLOW)
            .is_ok_and(|stat| FileType::from_raw_mode(stat.st_mode) == FileType::Symlink)
    }

    fn symbolic_link_target(&self, path: &Path) -> Result<PathBuf> {
        let target = rfs::readlink(path, Vec::new()).map_err(|errno| Error::Unresolvable {
            path: path.to_path_buf(),
            reason: io::Error::from(errno).to_string(),
        })?;
        Ok(PathBuf::from(OsStr::from_bytes(target.to_bytes())))
    }

    fn list_children(&self, path: &Path) -> io::Result<Listing> {
        list_entries(path)
    }
}

#[cfg(not(unix))]
impl FileSystem for PosixFileSystem {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Portable
    }

    fn exists(&self, path: &Path) -> bool {
        portable::PortableFileSystem.exists(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        portable::PortableFileSystem.is_directory(path)
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        portable::PortableFileSystem.is_symbolic_link(path)
    }

    fn symbolic_link_target(&self, path: &Path) -> Result<PathBuf> {
        portable::read_link_target(path)
    }

    fn list_children(&self, path: &Path) -> io::Result<Listing> {
        log::debug!("posix backend invoked on non-Unix platform; using portable listing");
        portable::PortableFileSystem.list_children(path)
    }
}

#[cfg(unix)]
fn list_entries(dir: &Path) -> io::Result<Listing> {
    let dir_fd = rfs::openat(
        rfs::CWD,
        dir,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        Mode::empty(),
    )
    .map_err(io::Error::from)?;

    let entries = Dir::read_from(&dir_fd).map_err(io::Error::from)?;
    let mut listing = Listing::default();

    for entry_result in entries {
        let entry = entry_result.map_err(io::Error::from)?;

        let name = entry.file_name();
        let name_bytes = name.to_bytes();
        if name_bytes == b"." || name_bytes == b".." {
            continue;
        }

        let child_path = dir.join(OsStr::from_bytes(name_bytes));

        let entry_type = match entry.file_type() {
            FileType::Unknown => match rfs::statat(&dir_fd, name, AtFlags::SYMLINK_NOFOLLOW) {
                Ok(stat) => FileType::from_raw_mode(stat.st_mode),
                Err(errno) => {
                    log::debug!("Entry vanished during listing: {}: {errno}", child_path.display());
                    continue;
                }
            },
            known => known,
        };

        let is_symlink = entry_type == FileType::Symlink;
        let target_type = if is_symlink {
            match rfs::statat(&dir_fd, name, AtFlags::empty()) {
                Ok(stat) => FileType::from_raw_mode(stat.st_mode),
                Err(errno) => {
                    log::debug!("Skipping dangling link {}: {errno}", child_path.display());
                    continue;
                }
            }
        } else {
            entry_type
        };

        let node = match target_type {
            FileType::Directory => Node::directory(child_path, is_symlink),
            FileType::RegularFile => Node::file(child_path),
            _ => {
                log::debug!("Skipping special file {}", child_path.display());
                continue;
            }
        };

        listing.push(node);
    }

    Ok(listing.sorted())
}
