//! Collaborators the engine consults about its surroundings.
//!
//! Both are injected into [`DownloadEngine`](super::DownloadEngine) so tests
//! and embedding applications can substitute their own view of the host.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use sysinfo::Disks;

/// Reports whether the host currently has network connectivity.
pub trait NetworkStatus: Send + Sync + fmt::Debug {
    fn is_available(&self) -> bool;
}

/// Network status that always reports connectivity.
///
/// Suitable where connectivity loss surfaces as transport errors anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

impl NetworkStatus for AssumeOnline {
    fn is_available(&self) -> bool {
        true
    }
}

/// Queries free space for a destination directory.
pub trait StorageProbe: Send + Sync + fmt::Debug {
    /// Bytes available to the current user in the filesystem holding `dir`.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the filesystem cannot be queried.
    fn available_space(&self, dir: &Path) -> io::Result<u64>;
}

/// Storage probe backed by the disk list of the operating system.
///
/// The disk whose mount point is the longest prefix of the directory wins.
/// Missing directories are resolved through their nearest existing ancestor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorageProbe;

impl StorageProbe for FsStorageProbe {
    fn available_space(&self, dir: &Path) -> io::Result<u64> {
        let target = nearest_existing_path(dir);
        let target = std::fs::canonicalize(&target).unwrap_or(target);
        let disks = Disks::new_with_refreshed_list();

        let mut best: Option<(usize, u64)> = None;
        for disk in disks.list() {
            let mount = disk.mount_point();
            if target.starts_with(mount) {
                let depth = mount.components().count();
                match best {
                    Some((best_depth, _)) if best_depth >= depth => {}
                    _ => best = Some((depth, disk.available_space())),
                }
            }
        }

        best.map(|(_, available)| available).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no mounted disk holds {}", target.display()),
            )
        })
    }
}

fn nearest_existing_path(path: &Path) -> PathBuf {
    let mut candidate = path.to_path_buf();
    while !candidate.exists() {
        if !candidate.pop() {
            return PathBuf::from(".");
        }
    }
    candidate
}
