//! Scoped descriptor acquisition for path-based entry points.
//!
//! Every path probe follows the same sequence: open the path once (symlink
//! following decided by `O_NOFOLLOW`, never by a separate lookup), classify the
//! descriptor, drop it. The `OwnedFd` closes on every exit path.
use std::path::Path;

use rustix::fd::{AsFd, OwnedFd};
use rustix::fs::{fstat, openat, Mode, OFlags, Stat, CWD};

use crate::types::errors::{ProbeError, Result};

/// Open `path` as an `O_PATH` handle suitable for `fstat`/`fstatfs`.
///
/// With `follow == false` a trailing symlink is opened itself rather than its target.
///
/// # Errors
///
/// Returns `NotFound`/`PermissionDenied` for the matching errnos, `Io` otherwise.
pub fn open_path(path: &Path, follow: bool) -> Result<OwnedFd> {
    let mut flags = OFlags::PATH | OFlags::CLOEXEC;
    if !follow {
        flags |= OFlags::NOFOLLOW;
    }
    openat(CWD, path, flags, Mode::empty())
        .map_err(|e| ProbeError::from_errno(e, Some(path), "open"))
}

/// `fstat` an already-open descriptor.
///
/// # Errors
///
/// Returns the mapped errno when the kernel refuses the call.
pub fn fstat_fd<Fd: AsFd>(fd: Fd) -> Result<Stat> {
    fstat(fd).map_err(|e| ProbeError::from_errno(e, None, "fstat"))
}

/// Open `path`, hand the descriptor to `f`, close it.
pub(crate) fn with_path<T>(
    path: &Path,
    follow: bool,
    f: impl FnOnce(&OwnedFd) -> Result<T>,
) -> Result<T> {
    let fd = open_path(path, follow)?;
    f(&fd)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn missing_path_reports_not_found() {
        let td = tempfile::tempdir().unwrap();
        let err = open_path(&td.path().join("nope"), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn nofollow_opens_the_link_itself() {
        let td = tempfile::tempdir().unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(td.path(), &link).unwrap();
        let st = with_path(&link, false, |fd| fstat_fd(fd)).unwrap();
        assert_eq!(
            crate::types::FileKind::from_mode(st.st_mode as u32),
            crate::types::FileKind::Symlink
        );
        let st = with_path(&link, true, |fd| fstat_fd(fd)).unwrap();
        assert_eq!(
            crate::types::FileKind::from_mode(st.st_mode as u32),
            crate::types::FileKind::Directory
        );
    }
}
