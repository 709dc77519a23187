use std::path::{Path, PathBuf};

use rustix::fd::{AsFd, BorrowedFd};

/// What a probe looks at: a path to be opened, or a descriptor the caller already holds.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Path(&'a Path),
    Fd(BorrowedFd<'a>),
}

impl Target<'_> {
    /// The path, when there is one, for error reporting.
    #[must_use]
    pub const fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(*p),
            Self::Fd(_) => None,
        }
    }
}

impl<'a> From<&'a Path> for Target<'a> {
    fn from(p: &'a Path) -> Self {
        Self::Path(p)
    }
}

impl<'a> From<&'a PathBuf> for Target<'a> {
    fn from(p: &'a PathBuf) -> Self {
        Self::Path(p.as_path())
    }
}

impl<'a> From<BorrowedFd<'a>> for Target<'a> {
    fn from(fd: BorrowedFd<'a>) -> Self {
        Self::Fd(fd)
    }
}

impl<'a> From<&'a std::fs::File> for Target<'a> {
    fn from(f: &'a std::fs::File) -> Self {
        Self::Fd(f.as_fd())
    }
}
