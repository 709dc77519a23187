//! Mount table inspection.

use std::path::{Path, PathBuf};

use crate::constants::PROC_SELF_MOUNTS;
use crate::types::errors::{ProbeError, Result};
use crate::types::MountEntry;

pub trait MountInspector {
    /// Mount entry covering `path`.
    ///
    /// # Errors
    ///
    /// `ProcUnavailable` when the mount table cannot be read at all, `NotFound`
    /// when no entry covers `path`.
    fn entry_for(&self, path: &Path) -> Result<MountEntry>;
}

/// Production inspector backed by the proc mount table.
#[derive(Debug, Clone)]
pub struct ProcMountsInspector {
    table: PathBuf,
}

impl Default for ProcMountsInspector {
    fn default() -> Self {
        Self {
            table: PathBuf::from(PROC_SELF_MOUNTS),
        }
    }
}

/// Undo the octal escaping (`\040` for space, ...) the kernel applies to mount table fields.
fn unescape(field: &str) -> String {
    let b = field.as_bytes();
    let mut out = Vec::with_capacity(b.len());
    let mut i = 0;
    while i < b.len() {
        if b[i] == b'\\' && i + 4 <= b.len() {
            let oct = &b[i + 1..i + 4];
            if oct.iter().all(|c| (b'0'..=b'7').contains(c)) {
                let v = oct.iter().fold(0u32, |acc, c| acc * 8 + u32::from(c - b'0'));
                if let Ok(v) = u8::try_from(v) {
                    out.push(v);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(b[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Longest mount point that is a prefix of `path`.
fn best_match(content: &str, path: &Path) -> Option<MountEntry> {
    let mut best: Option<MountEntry> = None;
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [_src, mnt, fstype, opts, ..] = parts.as_slice() else {
            continue;
        };
        let mnt = PathBuf::from(unescape(mnt));
        if !path.starts_with(&mnt) {
            continue;
        }
        // Later entries shadow earlier ones on the same mount point.
        if best
            .as_ref()
            .is_some_and(|b| mnt.as_os_str().len() < b.mount_point.as_os_str().len())
        {
            continue;
        }
        let opts: Vec<&str> = opts.split(',').collect();
        best = Some(MountEntry {
            mount_point: mnt,
            fs_type: (*fstype).to_string(),
            read_only: !opts.contains(&"rw"),
            no_exec: opts.contains(&"noexec"),
        });
    }
    best
}

impl ProcMountsInspector {
    /// Inspector over an arbitrary table in `/proc/self/mounts` format.
    #[must_use]
    pub fn from_table(table: PathBuf) -> Self {
        Self { table }
    }
}

impl MountInspector for ProcMountsInspector {
    fn entry_for(&self, path: &Path) -> Result<MountEntry> {
        let content = std::fs::read_to_string(&self.table).map_err(|e| {
            match ProbeError::from_io(e, Some(self.table.as_path()), "read mount table") {
                ProbeError::NotFound(_) => ProbeError::ProcUnavailable,
                other => other,
            }
        })?;
        // Symlinked paths are matched where they lead; a missing path is matched as given.
        let p = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        best_match(&content, &p).ok_or_else(|| ProbeError::NotFound(Some(p)))
    }
}

/// Whether the mount covering `path` accepts writes.
///
/// # Errors
///
/// Whatever the inspector fails with; an unknown mount state is never reported as writable.
pub fn mount_allows_write(inspector: &impl MountInspector, path: &Path) -> Result<bool> {
    inspector.entry_for(path).map(|e| !e.read_only)
}

/// Require the mount covering `path` to accept writes.
///
/// # Errors
///
/// `ReadOnlyMount` naming the mount point when it is read-only, otherwise whatever
/// the inspector fails with.
pub fn ensure_writable(inspector: &impl MountInspector, path: &Path) -> Result<()> {
    let entry = inspector.entry_for(path)?;
    if entry.read_only {
        return Err(ProbeError::ReadOnlyMount(entry.mount_point));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    const TABLE: &str = "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/sda2 / ext4 rw,relatime 0 0
/dev/sda3 /srv ext4 ro,relatime 0 0
tmpfs /srv/scratch\\040space tmpfs rw,nosuid,noexec 0 0
/dev/loop0 /snap/core squashfs ro,nodev 0 0
";

    struct MockInspector {
        entry: Result<MountEntry>,
    }

    impl MountInspector for MockInspector {
        fn entry_for(&self, _path: &Path) -> Result<MountEntry> {
            match &self.entry {
                Ok(e) => Ok(e.clone()),
                Err(_) => Err(ProbeError::ProcUnavailable),
            }
        }
    }

    #[test]
    fn longest_prefix_wins() {
        let e = best_match(TABLE, Path::new("/srv/data/x")).unwrap();
        assert_eq!(e.mount_point, Path::new("/srv"));
        assert!(e.read_only);
        let e = best_match(TABLE, Path::new("/home/u")).unwrap();
        assert_eq!(e.mount_point, Path::new("/"));
        assert_eq!(e.fs_type, "ext4");
        assert!(!e.read_only);
        assert!(!e.no_exec);
    }

    #[test]
    fn escaped_mount_points_are_decoded() {
        let e = best_match(TABLE, Path::new("/srv/scratch space/f")).unwrap();
        assert_eq!(e.fs_type, "tmpfs");
        assert!(e.no_exec);
        assert_eq!(unescape("a\\040b\\011c"), "a b\tc");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn missing_table_is_proc_unavailable() {
        let td = tempfile::tempdir().unwrap();
        let ins = ProcMountsInspector::from_table(td.path().join("mounts"));
        let err = ins.entry_for(Path::new("/")).unwrap_err();
        assert!(matches!(err, ProbeError::ProcUnavailable));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn table_file_is_consulted() {
        let td = tempfile::tempdir().unwrap();
        let table = td.path().join("mounts");
        std::fs::write(&table, TABLE).unwrap();
        let ins = ProcMountsInspector::from_table(table);
        assert!(!mount_allows_write(&ins, Path::new("/snap/core/bin")).unwrap());
        assert!(mount_allows_write(&ins, Path::new("/nonexistent/x")).unwrap());
    }

    #[test]
    fn ensure_writable_names_the_read_only_mount() {
        let td = tempfile::tempdir().unwrap();
        let table = td.path().join("mounts");
        std::fs::write(&table, TABLE).unwrap();
        let ins = ProcMountsInspector::from_table(table);
        let err = ensure_writable(&ins, Path::new("/srv/data/x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadOnly);
        assert!(matches!(&err, ProbeError::ReadOnlyMount(m) if m == Path::new("/srv")));
        assert_eq!(err.to_string(), "read-only mount: /srv");
        ensure_writable(&ins, Path::new("/nonexistent/x")).unwrap();
        let missing = ProcMountsInspector::from_table(td.path().join("absent"));
        assert!(matches!(
            ensure_writable(&missing, Path::new("/")),
            Err(ProbeError::ProcUnavailable)
        ));
    }

    #[test]
    fn unknown_state_is_an_error() {
        let ins = MockInspector { entry: Err(ProbeError::ProcUnavailable) };
        assert!(mount_allows_write(&ins, Path::new("/tmp")).is_err());
        let ins = MockInspector {
            entry: Ok(MountEntry {
                mount_point: PathBuf::from("/"),
                fs_type: "ext4".into(),
                read_only: false,
                no_exec: false,
            }),
        };
        assert!(mount_allows_write(&ins, Path::new("/tmp")).unwrap());
    }
}
