#![forbid(unsafe_code)]
//! statguard: point-in-time trust checks on files, directories, mounts and device numbers.
//!
//! Safety model highlights:
//! - Path entry points open once (`O_PATH`, symlink following decided by `O_NOFOLLOW`) and
//!   classify the descriptor. Nothing re-resolves a path between check and use.
//! - Every answer comes from a fresh syscall. Callers that need consistency across several
//!   checks capture one [`types::FileMetadata`] and reuse it.
//! - `statx` degrades to `fstatat` transparently; fields the legacy call can't supply are `None`.
//! - Device numbers are bounded by the kernel's 12/20-bit split, not glibc's `dev_t`.
//! - This crate forbids `unsafe` and uses `rustix` for syscalls.

pub mod config;
pub mod constants;
pub mod fs;
pub mod types;

pub use config::DeviceLayout;
pub use fs::{
    canonical_path, classify, encode_path, ensure_writable, fd_is_fs_type, fd_verify_directory,
    fd_verify_regular, files_same, is_currently_mounted, is_directory, is_empty_or_absent,
    is_fs_type, metadata_identical, parse_path, path_is_fs_type, path_is_read_only,
    probe_extended, verify_directory, verify_regular,
};
pub use rustix::fs::{AtFlags, StatxFlags};
pub use types::{
    major_valid, minor_valid, Classification, DecodeError, DeviceKind, DeviceNumber, EncodeError,
    ErrorKind, ExtendedMetadata, FileKind, FileMetadata, FilesystemInfo, MountEntry, ProbeError,
    ProbeSource, Target, Timestamp,
};
