//! Shared test helpers for the statguard integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Scratch directory removed on drop.
pub fn with_temp_root() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

/// Write `bytes` to `root/name` and return the path.
pub fn write_file(root: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let p = root.join(name);
    std::fs::write(&p, bytes).expect("write");
    p
}
