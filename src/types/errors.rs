//! Error types used across statguard.
use std::path::{Path, PathBuf};

use rustix::io::Errno;
use thiserror::Error;

/// Error categories shared by every fallible probe, codec and verifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("not a regular file")]
    NotRegular,
    #[error("not a directory")]
    NotDirectory,
    #[error("malformed device path")]
    Malformed,
    #[error("device number out of range")]
    OutOfRange,
    #[error("read-only")]
    ReadOnly,
    /// Extended query unavailable. Recovered internally, never returned by public calls.
    #[error("unsupported")]
    Unsupported,
    #[error("io error")]
    Io,
}

fn describe(path: Option<&PathBuf>) -> String {
    path.map(|p| format!(": {}", p.display())).unwrap_or_default()
}

/// Failure of a metadata, kind or filesystem probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("not found{}", describe(.0.as_ref()))]
    NotFound(Option<PathBuf>),
    #[error("permission denied{}", describe(.0.as_ref()))]
    PermissionDenied(Option<PathBuf>),
    #[error("not a regular file")]
    NotRegular,
    #[error("not a directory")]
    NotDirectory,
    /// The mount covering the path does not accept writes.
    #[error("read-only mount{}", describe(Some(.0)))]
    ReadOnlyMount(PathBuf),
    /// procfs is required for the query but is not mounted.
    #[error("/proc is not mounted")]
    ProcUnavailable,
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::NotRegular => ErrorKind::NotRegular,
            Self::NotDirectory => ErrorKind::NotDirectory,
            Self::ReadOnlyMount(_) => ErrorKind::ReadOnly,
            Self::ProcUnavailable | Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Map a raw errno from a syscall against `path` (if any) into the taxonomy.
    pub(crate) fn from_errno(e: Errno, path: Option<&Path>, context: &str) -> Self {
        let path = path.map(Path::to_path_buf);
        if e == Errno::NOENT {
            Self::NotFound(path)
        } else if e == Errno::ACCESS || e == Errno::PERM {
            Self::PermissionDenied(path)
        } else {
            Self::Io {
                context: context.to_string(),
                source: std::io::Error::from_raw_os_error(e.raw_os_error()),
            }
        }
    }

    pub(crate) fn from_io(e: std::io::Error, path: Option<&Path>, context: &str) -> Self {
        match e.raw_os_error() {
            Some(raw) => Self::from_errno(Errno::from_raw_os_error(raw), path, context),
            None => match e.kind() {
                std::io::ErrorKind::NotFound => Self::NotFound(path.map(Path::to_path_buf)),
                std::io::ErrorKind::PermissionDenied => {
                    Self::PermissionDenied(path.map(Path::to_path_buf))
                }
                _ => Self::Io {
                    context: context.to_string(),
                    source: e,
                },
            },
        }
    }
}

/// Failure to build a device path from a device number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("major {0} exceeds the kernel's 12-bit major space")]
    InvalidMajor(u32),
    #[error("minor {0} exceeds the kernel's 20-bit minor space")]
    InvalidMinor(u32),
    /// Mode bits denote neither a character nor a block device.
    #[error("mode does not denote a device node")]
    NotADevice,
}

impl EncodeError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMajor(_) | Self::InvalidMinor(_) => ErrorKind::OutOfRange,
            Self::NotADevice => ErrorKind::Malformed,
        }
    }
}

/// Failure to parse a device path back into kind and number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed device path: {0}")]
    Malformed(String),
    #[error("device number {major}:{minor} exceeds kernel limits")]
    OutOfRange { major: u64, minor: u64 },
}

impl DecodeError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}

/// Convenient alias for results returning a `ProbeError`.
pub type Result<T> = std::result::Result<T, ProbeError>;
