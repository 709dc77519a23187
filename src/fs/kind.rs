//! File kind verification.
//!
//! Path entry points open first and classify the descriptor; a path is never
//! stat'ed and then trusted for a later open.
use std::path::Path;

use rustix::fd::AsFd;

use super::open::with_path;
use super::probe::snapshot_fd;
use crate::types::errors::{ProbeError, Result};
use crate::types::{FileKind, FileMetadata, Target};

/// # Errors
///
/// `NotRegular` unless the snapshot is a regular file.
pub fn verify_regular(md: &FileMetadata) -> Result<()> {
    match md.kind {
        FileKind::Regular => Ok(()),
        _ => Err(ProbeError::NotRegular),
    }
}

/// # Errors
///
/// `NotDirectory` unless the snapshot is a directory.
pub fn verify_directory(md: &FileMetadata) -> Result<()> {
    match md.kind {
        FileKind::Directory => Ok(()),
        _ => Err(ProbeError::NotDirectory),
    }
}

/// `fstat` the descriptor and require a regular file.
///
/// # Errors
///
/// `NotRegular`, or the `fstat` failure.
pub fn fd_verify_regular<Fd: AsFd>(fd: Fd) -> Result<()> {
    verify_regular(&snapshot_fd(fd)?)
}

/// `fstat` the descriptor and require a directory.
///
/// # Errors
///
/// `NotDirectory`, or the `fstat` failure.
pub fn fd_verify_directory<Fd: AsFd>(fd: Fd) -> Result<()> {
    verify_directory(&snapshot_fd(fd)?)
}

/// # Errors
///
/// The `fstat` failure.
pub fn is_dir_fd<Fd: AsFd>(fd: Fd) -> Result<bool> {
    Ok(snapshot_fd(fd)?.kind == FileKind::Directory)
}

/// # Errors
///
/// `NotFound`, `PermissionDenied` or `Io` from the open.
pub fn is_dir(path: &Path, follow: bool) -> Result<bool> {
    with_path(path, follow, |fd| is_dir_fd(fd))
}

/// Whether `target` is a directory.
///
/// `follow` controls whether a trailing symlink in a path is resolved; it has no
/// effect on a descriptor, which is classified as-is without reopening.
///
/// # Errors
///
/// See [`is_dir`] and [`is_dir_fd`].
pub fn is_directory<'a>(target: impl Into<Target<'a>>, follow: bool) -> Result<bool> {
    match target.into() {
        Target::Path(p) => is_dir(p, follow),
        Target::Fd(fd) => is_dir_fd(fd),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn empty_regular_file_verifies() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("empty");
        let f = std::fs::File::create(&p).unwrap();
        fd_verify_regular(&f).unwrap();
        assert_eq!(fd_verify_directory(&f).unwrap_err().kind(), ErrorKind::NotDirectory);
    }

    #[test]
    fn directory_descriptor_is_not_regular() {
        let td = tempfile::tempdir().unwrap();
        let d = std::fs::File::open(td.path()).unwrap();
        assert_eq!(fd_verify_regular(&d).unwrap_err().kind(), ErrorKind::NotRegular);
        fd_verify_directory(&d).unwrap();
        assert!(is_directory(&d, false).unwrap());
    }

    #[test]
    fn symlink_to_dir_depends_on_follow() {
        let td = tempfile::tempdir().unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(td.path(), &link).unwrap();
        assert!(is_directory(&link, true).unwrap());
        assert!(!is_directory(&link, false).unwrap());
    }

    #[test]
    fn missing_path_is_an_error_not_false() {
        let td = tempfile::tempdir().unwrap();
        let err = is_dir(&td.path().join("nope"), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
