//! Integration tests for symbolic-link handling and cycle safety

#![cfg(unix)]

use crate::fixtures::ScriptedVisitor;
use dirkeep::services::platform::portable::PortableFileSystem;
use dirkeep::services::platform::{FileSystem, Listing, PlatformKind};
use dirkeep::{Error, WalkConfig, Walker};
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn following() -> WalkConfig {
    WalkConfig {
        follow_symlinks: true,
        ..WalkConfig::default()
    }
}

fn pre_visits(visitor: &ScriptedVisitor) -> Vec<&str> {
    visitor
        .events
        .iter()
        .filter_map(|e| e.strip_prefix("pre "))
        .collect()
}

#[test]
fn test_direct_self_reference_terminates() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir(base.join("a")).unwrap();
    fs::write(base.join("a/f"), b"f").unwrap();
    symlink("../a", base.join("a/b")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut visitor).walk(base.join("a")).unwrap());

    assert_eq!(visitor.events, ["pre a", "visit a/f", "post a"]);
}

#[test]
fn test_dot_link_self_reference_terminates() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir(base.join("a")).unwrap();
    symlink(".", base.join("a/here")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut visitor).walk(base.join("a")).unwrap());
    assert_eq!(visitor.events, ["pre a", "post a"]);
}

#[test]
fn test_chained_link_back_to_start_terminates() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir(base.join("a")).unwrap();
    fs::write(base.join("a/f"), b"f").unwrap();
    symlink("y", base.join("a/x")).unwrap();
    symlink(".", base.join("a/y")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut visitor).walk(base.join("a")).unwrap());

    assert_eq!(visitor.events, ["pre a", "visit a/f", "post a"]);
}

#[test]
fn test_chained_links_enter_target_once() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir(base.join("z")).unwrap();
    fs::write(base.join("z/f"), b"f").unwrap();
    symlink("y", base.join("x")).unwrap();
    symlink("z", base.join("y")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut visitor).walk(base).unwrap());

    assert_eq!(pre_visits(&visitor), ["", "x"]);
    let visits = visitor.events.iter().filter(|e| e.ends_with("/f")).count();
    assert_eq!(visits, 1);
}

fn two_hop_tree(base: &Path) {
    fs::create_dir(base.join("a")).unwrap();
    fs::create_dir(base.join("b")).unwrap();
    symlink("../b", base.join("a/link1")).unwrap();
    symlink("../a", base.join("b/link2")).unwrap();
}

#[test]
fn test_two_hop_cycle_from_each_entry_point() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    two_hop_tree(base);

    let mut from_a = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut from_a).walk(base.join("a")).unwrap());
    assert_eq!(pre_visits(&from_a), ["a", "a/link1"]);

    let mut from_b = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut from_b).walk(base.join("b")).unwrap());
    assert_eq!(pre_visits(&from_b), ["b", "b/link2"]);
}

#[test]
fn test_two_hop_cycle_from_common_parent() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    two_hop_tree(base);
    let real_base = fs::canonicalize(base).unwrap();

    let config = WalkConfig {
        track_visited_directories: true,
        ..following()
    };
    let mut visitor = ScriptedVisitor::new(base);
    let mut walker = Walker::new(config, &mut visitor);
    assert!(walker.walk(base).unwrap());

    let visited = walker.visited_directories().to_vec();
    assert_eq!(visited.iter().filter(|p| **p == real_base.join("a")).count(), 1);
    assert_eq!(visited.iter().filter(|p| **p == real_base.join("b")).count(), 1);

    // b is entered once, through a/link1, and skipped as a sibling afterwards.
    assert_eq!(pre_visits(&visitor), ["", "a", "a/link1"]);
}

#[test]
fn test_unfollowed_links_never_pre_visited() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    two_hop_tree(base);
    fs::create_dir(base.join("z")).unwrap();
    symlink("z", base.join("y_link")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(WalkConfig::default(), &mut visitor).walk(base).unwrap());

    assert_eq!(pre_visits(&visitor), ["", "a", "b", "z"]);
}

#[test]
fn test_cycle_safety_without_reporting() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    two_hop_tree(base);

    let mut visitor = ScriptedVisitor::new(base);
    let mut walker = Walker::new(following(), &mut visitor);
    assert!(walker.walk(base).unwrap());

    assert!(walker.visited_directories().is_empty());
    assert_eq!(visitor.count("pre a/link1"), 1);
}

#[test]
fn test_link_into_already_walked_directory_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir_all(base.join("real/inner")).unwrap();
    fs::write(base.join("real/inner/f"), b"f").unwrap();
    symlink("real", base.join("s_alias")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut visitor).walk(base).unwrap());

    assert_eq!(pre_visits(&visitor), ["", "real", "real/inner"]);
    assert_eq!(visitor.count("visit real/inner/f"), 1);
}

#[test]
fn test_followed_link_marks_target_visited() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir_all(base.join("z/inner")).unwrap();
    fs::write(base.join("z/inner/f"), b"f").unwrap();
    symlink("z", base.join("alias")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(following(), &mut visitor).walk(base).unwrap());

    // Entered through the link first; the real directory is then a repeat.
    assert_eq!(pre_visits(&visitor), ["", "alias", "alias/inner"]);
    assert_eq!(visitor.count("visit alias/inner/f"), 1);
    assert_eq!(visitor.count("pre z"), 0);
}

#[test]
fn test_pruned_target_is_offered_again_through_link() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir(base.join("z")).unwrap();
    fs::write(base.join("z/f"), b"f").unwrap();
    symlink("z", base.join("zz_link")).unwrap();

    let mut visitor = ScriptedVisitor::new(base).pruning("z");
    assert!(Walker::new(following(), &mut visitor).walk(base).unwrap());

    assert_eq!(pre_visits(&visitor), ["", "z", "zz_link"]);
    assert_eq!(visitor.count("visit zz_link/f"), 1);
}

#[test]
fn test_unfollowed_link_root_is_silent() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir(base.join("z")).unwrap();
    symlink("z", base.join("link")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    assert!(Walker::new(WalkConfig::default(), &mut visitor).walk(base.join("link")).unwrap());
    assert!(visitor.events.is_empty());
}

/// Portable backend that cannot read any link target.
struct OpaqueLinks;

impl FileSystem for OpaqueLinks {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Portable
    }

    fn exists(&self, path: &Path) -> bool {
        PortableFileSystem.exists(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        PortableFileSystem.is_directory(path)
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        PortableFileSystem.is_symbolic_link(path)
    }

    fn symbolic_link_target(&self, path: &Path) -> dirkeep::Result<PathBuf> {
        Err(Error::Unresolvable {
            path: path.to_path_buf(),
            reason: "unsupported".to_string(),
        })
    }

    fn list_children(&self, path: &Path) -> io::Result<Listing> {
        PortableFileSystem.list_children(path)
    }
}

#[test]
fn test_unresolvable_link_is_treated_as_unfollowable() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    fs::create_dir(base.join("z")).unwrap();
    symlink("z", base.join("link")).unwrap();

    let mut visitor = ScriptedVisitor::new(base);
    let mut walker = Walker::with_platform(following(), &mut visitor, Arc::new(OpaqueLinks));
    assert!(walker.walk(base).unwrap());

    assert_eq!(pre_visits(&visitor), ["", "z"]);
}
