//! Filesystem classification from `statfs` magic numbers.
//!
//! `statfs.f_type` is `long` on most architectures, `int` on some and unsigned
//! on others, so a magic like `0xFF534D42` may arrive sign-extended. Every
//! comparison goes through [`fs_type_code`], which reduces both sides to the
//! kernel's 32-bit value.
use std::path::Path;

use rustix::fd::AsFd;
use rustix::fs::{accessat, fstatfs, fstatvfs, Access, AtFlags, StatVfsMountFlags};
use rustix::io::Errno;

use super::open::with_path;
use crate::constants::{
    NETWORK_FS_MAGICS, PROC_ROOT, PROC_SUPER_MAGIC, READ_ONLY_FS_MAGICS, TEMPORARY_FS_MAGICS,
};
use crate::types::errors::{ProbeError, Result};
use crate::types::{Classification, FilesystemInfo};

/// Integer types `statfs.f_type` is declared as across Linux architectures.
pub trait FsTypeField: Copy {
    fn to_magic(self) -> u32;
}

macro_rules! impl_fs_type_field {
    ($($t:ty),*) => {
        $(impl FsTypeField for $t {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn to_magic(self) -> u32 {
                self as u32
            }
        })*
    };
}

impl_fs_type_field!(i32, u32, i64, u64);

/// Normalize a raw `f_type` (or a magic constant) to the 32-bit magic.
#[must_use]
pub fn fs_type_code<T: FsTypeField>(raw: T) -> u32 {
    raw.to_magic()
}

/// `fstatfs` + `fstatvfs` on an open descriptor.
///
/// # Errors
///
/// The mapped errno of either call.
pub fn filesystem_info_fd<Fd: AsFd>(fd: Fd) -> Result<FilesystemInfo> {
    let sfs = fstatfs(&fd).map_err(|e| ProbeError::from_errno(e, None, "fstatfs"))?;
    let svfs = fstatvfs(&fd).map_err(|e| ProbeError::from_errno(e, None, "fstatvfs"))?;
    Ok(FilesystemInfo {
        type_code: fs_type_code(sfs.f_type),
        read_only: svfs.f_flag.contains(StatVfsMountFlags::RDONLY),
    })
}

/// # Errors
///
/// Failure to open `path` or query its filesystem.
pub fn filesystem_info_path(path: &Path) -> Result<FilesystemInfo> {
    with_path(path, true, |fd| filesystem_info_fd(fd))
}

#[must_use]
pub fn is_fs_type<M: FsTypeField>(info: &FilesystemInfo, magic: M) -> bool {
    info.type_code == fs_type_code(magic)
}

fn is_any_of(info: &FilesystemInfo, magics: &[u32]) -> bool {
    magics.iter().any(|&m| is_fs_type(info, m))
}

#[must_use]
pub fn is_temporary_fs(info: &FilesystemInfo) -> bool {
    is_any_of(info, TEMPORARY_FS_MAGICS)
}

#[must_use]
pub fn is_network_fs(info: &FilesystemInfo) -> bool {
    is_any_of(info, NETWORK_FS_MAGICS)
}

/// Formats with no write support at all (squashfs, iso9660, ...).
#[must_use]
pub fn is_read_only_kind(info: &FilesystemInfo) -> bool {
    is_any_of(info, READ_ONLY_FS_MAGICS)
}

#[must_use]
pub fn classify(info: &FilesystemInfo) -> Classification {
    if is_temporary_fs(info) {
        Classification::Temporary
    } else if is_network_fs(info) {
        Classification::Network
    } else {
        Classification::Other
    }
}

/// # Errors
///
/// The `fstatfs` failure.
pub fn fd_is_fs_type<Fd: AsFd, M: FsTypeField>(fd: Fd, magic: M) -> Result<bool> {
    let sfs = fstatfs(&fd).map_err(|e| ProbeError::from_errno(e, None, "fstatfs"))?;
    Ok(fs_type_code(sfs.f_type) == fs_type_code(magic))
}

/// # Errors
///
/// Failure to open `path` or query its filesystem.
pub fn path_is_fs_type<M: FsTypeField>(path: &Path, magic: M) -> Result<bool> {
    with_path(path, true, |fd| fd_is_fs_type(fd, magic))
}

/// # Errors
///
/// The filesystem query failure.
pub fn fd_is_temporary_fs<Fd: AsFd>(fd: Fd) -> Result<bool> {
    filesystem_info_fd(fd).map(|i| is_temporary_fs(&i))
}

/// # Errors
///
/// The filesystem query failure.
pub fn fd_is_network_fs<Fd: AsFd>(fd: Fd) -> Result<bool> {
    filesystem_info_fd(fd).map(|i| is_network_fs(&i))
}

/// # Errors
///
/// Failure to open `path` or query its filesystem.
pub fn path_is_temporary_fs(path: &Path) -> Result<bool> {
    with_path(path, true, |fd| fd_is_temporary_fs(fd))
}

/// Whether writes under `path` are bound to fail.
///
/// True when the mount carries `ST_RDONLY`, when the filesystem format is
/// inherently read-only, or when a write-access probe answers `EROFS` (NFS
/// exports can be read-only server-side while statvfs reports rw).
///
/// # Errors
///
/// Failure to open `path` or query its filesystem. Never answers `false` on error.
pub fn path_is_read_only(path: &Path) -> Result<bool> {
    with_path(path, true, |fd| fd_is_read_only(fd))
}

fn fd_is_read_only<Fd: AsFd>(fd: Fd) -> Result<bool> {
    let info = filesystem_info_fd(&fd)?;
    if info.read_only || is_read_only_kind(&info) {
        return Ok(true);
    }
    let write_check = accessat(&fd, "", Access::WRITE_OK, AtFlags::EMPTY_PATH);
    Ok(matches!(write_check, Err(e) if e == Errno::ROFS))
}

/// Whether procfs is mounted at `/proc`. A missing `/proc` is `Ok(false)`.
///
/// # Errors
///
/// Any failure other than `NotFound` while probing `/proc`.
pub fn is_currently_mounted() -> Result<bool> {
    match path_is_fs_type(Path::new(PROC_ROOT), PROC_SUPER_MAGIC) {
        Err(ProbeError::NotFound(_)) => Ok(false),
        other => other,
    }
}
