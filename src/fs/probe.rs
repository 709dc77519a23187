//! Metadata snapshots, the statx probe with legacy fallback, and snapshot comparisons.
//!
//! - [`snapshot_fd`]/[`snapshot_path`] produce a [`FileMetadata`] from one `fstat`.
//! - [`probe_extended`] asks `statx(2)` and degrades to `fstatat(2)` when the call
//!   is unavailable, marking fields the legacy call cannot supply as `None`.
//! - [`metadata_identical`] detects a file replaced between two looks.
//! - [`is_empty_or_absent`] implements sentinel-file semantics.
use std::path::Path;

use rustix::fd::{AsFd, BorrowedFd};
use rustix::fs::{statat, statx, AtFlags, Stat, Statx, StatxFlags, CWD};
use rustix::io::Errno;

use super::open::{fstat_fd, open_path, with_path};
use crate::types::errors::{ProbeError, Result};
use crate::types::{
    DeviceNumber, ExtendedMetadata, FileKind, FileMetadata, ProbeSource, Target, Timestamp,
};

/// Flags `fstatat` understands. Sync-mode flags are statx-only and safe to drop.
fn legacy_flags(flags: AtFlags) -> Option<AtFlags> {
    let passthrough = AtFlags::SYMLINK_NOFOLLOW | AtFlags::EMPTY_PATH | AtFlags::NO_AUTOMOUNT;
    let droppable =
        AtFlags::STATX_SYNC_AS_STAT | AtFlags::STATX_FORCE_SYNC | AtFlags::STATX_DONT_SYNC;
    if flags.difference(passthrough | droppable).is_empty() {
        Some(flags & passthrough)
    } else {
        None
    }
}

/// Errnos meaning "statx itself is unusable here", as opposed to a real failure on the file.
fn statx_unavailable(e: Errno) -> bool {
    e == Errno::NOSYS || e == Errno::OPNOTSUPP || e == Errno::PERM
}

// The layout of `struct stat` differs per architecture; these casts normalize it.
#[allow(
    clippy::unnecessary_cast,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::useless_conversion
)]
pub(crate) fn metadata_from_stat(st: &Stat) -> FileMetadata {
    let mode = st.st_mode as u32;
    FileMetadata {
        dev: st.st_dev as u64,
        ino: st.st_ino as u64,
        kind: FileKind::from_mode(mode),
        size: u64::try_from(st.st_size).unwrap_or(0),
        mtime: Timestamp {
            sec: st.st_mtime as i64,
            nsec: st.st_mtime_nsec as u32,
        },
        mode,
        rdev: st.st_rdev as u64,
    }
}

#[allow(
    clippy::unnecessary_cast,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::useless_conversion
)]
fn extended_from_stat(st: &Stat) -> ExtendedMetadata {
    let mode = st.st_mode as u32;
    ExtendedMetadata {
        mask: StatxFlags::BASIC_STATS,
        source: ProbeSource::LegacyStat,
        dev: DeviceNumber::from_dev(st.st_dev as u64),
        ino: st.st_ino as u64,
        kind: FileKind::from_mode(mode),
        mode,
        nlink: st.st_nlink as u64,
        uid: st.st_uid as u32,
        gid: st.st_gid as u32,
        size: u64::try_from(st.st_size).unwrap_or(0),
        blocks: u64::try_from(st.st_blocks).unwrap_or(0),
        rdev: DeviceNumber::from_dev(st.st_rdev as u64),
        atime: Timestamp {
            sec: st.st_atime as i64,
            nsec: st.st_atime_nsec as u32,
        },
        mtime: Timestamp {
            sec: st.st_mtime as i64,
            nsec: st.st_mtime_nsec as u32,
        },
        ctime: Timestamp {
            sec: st.st_ctime as i64,
            nsec: st.st_ctime_nsec as u32,
        },
        btime: None,
        mount_id: None,
        attributes: None,
    }
}

fn extended_from_statx(sx: &Statx) -> ExtendedMetadata {
    let mask = StatxFlags::from_bits_retain(sx.stx_mask);
    let mode = u32::from(sx.stx_mode);
    ExtendedMetadata {
        mask,
        source: ProbeSource::Statx,
        dev: DeviceNumber::new(sx.stx_dev_major, sx.stx_dev_minor),
        ino: sx.stx_ino,
        kind: FileKind::from_mode(mode),
        mode,
        nlink: u64::from(sx.stx_nlink),
        uid: sx.stx_uid,
        gid: sx.stx_gid,
        size: sx.stx_size,
        blocks: sx.stx_blocks,
        rdev: DeviceNumber::new(sx.stx_rdev_major, sx.stx_rdev_minor),
        atime: Timestamp {
            sec: sx.stx_atime.tv_sec,
            nsec: sx.stx_atime.tv_nsec,
        },
        mtime: Timestamp {
            sec: sx.stx_mtime.tv_sec,
            nsec: sx.stx_mtime.tv_nsec,
        },
        ctime: Timestamp {
            sec: sx.stx_ctime.tv_sec,
            nsec: sx.stx_ctime.tv_nsec,
        },
        btime: mask.contains(StatxFlags::BTIME).then_some(Timestamp {
            sec: sx.stx_btime.tv_sec,
            nsec: sx.stx_btime.tv_nsec,
        }),
        mount_id: mask.contains(StatxFlags::MNT_ID).then_some(sx.stx_mnt_id),
        attributes: Some(sx.stx_attributes),
    }
}

/// Snapshot the file behind an open descriptor.
///
/// # Errors
///
/// Returns the mapped errno if `fstat` fails.
pub fn snapshot_fd<Fd: AsFd>(fd: Fd) -> Result<FileMetadata> {
    fstat_fd(fd).map(|st| metadata_from_stat(&st))
}

/// Open `path`, snapshot it, close it.
///
/// # Errors
///
/// `NotFound` if nothing exists at `path`, `PermissionDenied` if it can't be reached.
pub fn snapshot_path(path: &Path, follow: bool) -> Result<FileMetadata> {
    with_path(path, follow, |fd| snapshot_fd(fd))
}

/// Full-fidelity form of [`probe_extended`]: `statx(dirfd, path, flags, mask)` with fallback.
///
/// # Errors
///
/// Any failure of the call that answered. Unavailability of `statx` alone never fails.
pub fn probe_extended_at<Fd: AsFd>(
    dirfd: Fd,
    path: &Path,
    flags: AtFlags,
    requested_mask: StatxFlags,
) -> Result<ExtendedMetadata> {
    probe_with(
        |fd, p, f, m| statx(fd, p, f, m),
        dirfd.as_fd(),
        path,
        flags,
        requested_mask,
    )
}

/// The statx-or-fallback decision, with the statx call supplied by the caller.
fn probe_with(
    query: impl FnOnce(BorrowedFd<'_>, &Path, AtFlags, StatxFlags) -> rustix::io::Result<Statx>,
    dirfd: BorrowedFd<'_>,
    path: &Path,
    flags: AtFlags,
    requested_mask: StatxFlags,
) -> Result<ExtendedMetadata> {
    let report = (!path.as_os_str().is_empty()).then_some(path);
    let e = match query(dirfd, path, flags, requested_mask) {
        Ok(sx) => return Ok(extended_from_statx(&sx)),
        Err(e) if statx_unavailable(e) => e,
        Err(e) => return Err(ProbeError::from_errno(e, report, "statx")),
    };
    let Some(legacy) = legacy_flags(flags) else {
        return Err(ProbeError::from_errno(e, report, "statx"));
    };
    log::debug!("statx unavailable ({e}), falling back to fstatat");
    statat(dirfd, path, legacy)
        .map(|st| extended_from_stat(&st))
        .map_err(|e| ProbeError::from_errno(e, report, "fstatat"))
}

/// Extended metadata for a path (symlinks followed) or an open descriptor.
///
/// `requested_mask` is a hint. Check [`ExtendedMetadata::has`] before trusting a field.
///
/// # Errors
///
/// `NotFound`, `PermissionDenied` or `Io` from the call that answered.
pub fn probe_extended<'a>(
    target: impl Into<Target<'a>>,
    requested_mask: StatxFlags,
) -> Result<ExtendedMetadata> {
    match target.into() {
        Target::Path(p) => probe_extended_at(CWD, p, AtFlags::empty(), requested_mask),
        Target::Fd(fd) => probe_fd(fd, requested_mask),
    }
}

fn probe_fd(fd: BorrowedFd<'_>, requested_mask: StatxFlags) -> Result<ExtendedMetadata> {
    probe_extended_at(fd, Path::new(""), AtFlags::EMPTY_PATH, requested_mask)
}

/// True iff both snapshots name the same inode with the same size and mtime.
#[must_use]
pub fn metadata_identical(a: &FileMetadata, b: &FileMetadata) -> bool {
    a.dev == b.dev && a.ino == b.ino && a.size == b.size && a.mtime == b.mtime
}

/// Empty regular file, or a character device (the `/dev/null` masking idiom).
#[must_use]
pub const fn null_or_empty(md: &FileMetadata) -> bool {
    match md.kind {
        FileKind::Regular => md.size == 0,
        FileKind::CharDevice => true,
        _ => false,
    }
}

/// Sentinel semantics: nothing there, or nothing in it. `None` means absent.
#[must_use]
pub fn is_empty_or_absent(md: Option<&FileMetadata>) -> bool {
    md.map_or(true, null_or_empty)
}

/// Path form of [`is_empty_or_absent`]. Symlinks are followed.
///
/// # Errors
///
/// Every failure except `NotFound`, which counts as absent.
pub fn path_is_empty_or_absent(path: &Path) -> Result<bool> {
    match snapshot_path(path, true) {
        Ok(md) => Ok(null_or_empty(&md)),
        Err(ProbeError::NotFound(_)) => Ok(true),
        Err(e) => Err(e),
    }
}

/// Whether two paths resolve to the same inode.
///
/// # Errors
///
/// Failure to open or stat either path.
pub fn files_same(a: &Path, b: &Path, follow: bool) -> Result<bool> {
    let fa = open_path(a, follow)?;
    let fb = open_path(b, follow)?;
    let (ma, mb) = (snapshot_fd(&fa)?, snapshot_fd(&fb)?);
    Ok(ma.dev == mb.dev && ma.ino == mb.ino)
}
