//! Point-in-time metadata snapshots.
//!
//! Nothing here is refreshed after construction. Two snapshots of the same file
//! are compared with [`crate::fs::metadata_identical`], never by path.
use std::path::Path;

use rustix::fd::AsFd;
use rustix::fs::{FileType, StatxFlags};
use serde::Serialize;

use super::device::DeviceNumber;
use super::errors::Result;

/// Kind of filesystem node, as encoded in the `S_IFMT` bits of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    CharDevice,
    BlockDevice,
    Socket,
    Fifo,
    Unknown,
}

impl FileKind {
    /// Classify raw `st_mode` bits.
    #[must_use]
    pub fn from_mode(mode: u32) -> Self {
        match FileType::from_raw_mode(mode) {
            FileType::RegularFile => Self::Regular,
            FileType::Directory => Self::Directory,
            FileType::Symlink => Self::Symlink,
            FileType::CharacterDevice => Self::CharDevice,
            FileType::BlockDevice => Self::BlockDevice,
            FileType::Socket => Self::Socket,
            FileType::Fifo => Self::Fifo,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp {
    pub sec: i64,
    pub nsec: u32,
}

/// Immutable snapshot produced by one `fstat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub dev: u64,
    pub ino: u64,
    pub kind: FileKind,
    pub size: u64,
    pub mtime: Timestamp,
    /// Full `st_mode`, including the type bits.
    pub mode: u32,
    /// Device the node represents, for character and block nodes.
    pub rdev: u64,
}

impl FileMetadata {
    /// Snapshot an open descriptor. See [`crate::fs::snapshot_fd`].
    ///
    /// # Errors
    ///
    /// The mapped `fstat` failure.
    pub fn of_fd<Fd: AsFd>(fd: Fd) -> Result<Self> {
        crate::fs::snapshot_fd(fd)
    }

    /// Open, snapshot and close `path`. See [`crate::fs::snapshot_path`].
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied` or `Io` from the open or `fstat`.
    pub fn of_path(path: &Path, follow: bool) -> Result<Self> {
        crate::fs::snapshot_path(path, follow)
    }

    /// Permission bits only (`mode & 07777`).
    #[must_use]
    pub const fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// Which kernel interface produced an [`ExtendedMetadata`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeSource {
    Statx,
    LegacyStat,
}

/// Result of [`crate::fs::probe_extended`].
///
/// Fields the answering interface could not supply are `None`. They are never
/// zero-filled, so a missing birth time can't make two files look identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedMetadata {
    #[serde(skip)]
    pub mask: StatxFlags,
    pub source: ProbeSource,
    pub dev: DeviceNumber,
    pub ino: u64,
    pub kind: FileKind,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub blocks: u64,
    pub rdev: DeviceNumber,
    pub atime: Timestamp,
    pub mtime: Timestamp,
    pub ctime: Timestamp,
    pub btime: Option<Timestamp>,
    pub mount_id: Option<u64>,
    pub attributes: Option<u64>,
}

impl ExtendedMetadata {
    /// Whether the answering interface actually filled in `field`.
    #[must_use]
    pub fn has(&self, field: StatxFlags) -> bool {
        self.mask.contains(field)
    }

    /// Collapse to the plain snapshot used for identity checks.
    ///
    /// `None` unless the answer carries inode, size and mtime: an identity built
    /// from unreported fields would match any other such record.
    #[must_use]
    pub fn to_file_metadata(&self) -> Option<FileMetadata> {
        if !self.has(StatxFlags::INO | StatxFlags::SIZE | StatxFlags::MTIME) {
            return None;
        }
        Some(FileMetadata {
            dev: self.dev.to_dev(),
            ino: self.ino,
            kind: self.kind,
            size: self.size,
            mtime: self.mtime,
            mode: self.mode,
            rdev: self.rdev.to_dev(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn from_mode_reads_type_bits_only() {
        assert_eq!(FileKind::from_mode(0o100_644), FileKind::Regular);
        assert_eq!(FileKind::from_mode(0o040_755), FileKind::Directory);
        assert_eq!(FileKind::from_mode(0o120_777), FileKind::Symlink);
        assert_eq!(FileKind::from_mode(0o020_666), FileKind::CharDevice);
        assert_eq!(FileKind::from_mode(0o060_660), FileKind::BlockDevice);
        assert_eq!(FileKind::from_mode(0o010_600), FileKind::Fifo);
        assert_eq!(FileKind::from_mode(0o140_755), FileKind::Socket);
    }

    fn unreported(mask: StatxFlags) -> ExtendedMetadata {
        let zero = Timestamp { sec: 0, nsec: 0 };
        ExtendedMetadata {
            mask,
            source: ProbeSource::Statx,
            dev: DeviceNumber::new(8, 1),
            ino: 0,
            kind: FileKind::Regular,
            mode: 0o100_644,
            nlink: 1,
            uid: 0,
            gid: 0,
            size: 0,
            blocks: 0,
            rdev: DeviceNumber::default(),
            atime: zero,
            mtime: zero,
            ctime: zero,
            btime: None,
            mount_id: None,
            attributes: None,
        }
    }

    #[test]
    fn identity_needs_inode_size_and_mtime_reported() {
        assert!(unreported(StatxFlags::TYPE).to_file_metadata().is_none());
        assert!(unreported(StatxFlags::INO | StatxFlags::SIZE)
            .to_file_metadata()
            .is_none());
        let full = unreported(StatxFlags::BASIC_STATS).to_file_metadata().unwrap();
        assert_eq!(full.dev, DeviceNumber::new(8, 1).to_dev());
        assert_eq!(full.kind, FileKind::Regular);
    }
}
