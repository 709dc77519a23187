//! Data-only filesystem and mount types.
use std::path::{Path, PathBuf};

use rustix::fd::AsFd;
use serde::Serialize;

use super::errors::Result;

/// One `statfs` answer about the filesystem holding a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilesystemInfo {
    /// Magic number, already normalized by [`crate::fs::fs_type_code`].
    pub type_code: u32,
    /// Mount is flagged read-only (`ST_RDONLY`).
    pub read_only: bool,
}

impl FilesystemInfo {
    /// Query the filesystem holding an open descriptor. See [`crate::fs::filesystem_info_fd`].
    ///
    /// # Errors
    ///
    /// The mapped `fstatfs`/`fstatvfs` failure.
    pub fn of_fd<Fd: AsFd>(fd: Fd) -> Result<Self> {
        crate::fs::filesystem_info_fd(fd)
    }

    /// Open `path` and query its filesystem. See [`crate::fs::filesystem_info_path`].
    ///
    /// # Errors
    ///
    /// Failure to open `path` or query its filesystem.
    pub fn of_path(path: &Path) -> Result<Self> {
        crate::fs::filesystem_info_path(path)
    }
}

/// Coarse storage class of a filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// In-memory, lost on reboot.
    Temporary,
    /// Backed by a remote host.
    Network,
    Other,
}

/// Entry of the proc mount table covering a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountEntry {
    pub mount_point: PathBuf,
    pub fs_type: String,
    pub read_only: bool,
    pub no_exec: bool,
}
