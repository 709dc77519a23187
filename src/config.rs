use std::path::{Path, PathBuf};

use crate::constants::{DEV_BLOCK_DIR, DEV_CHAR_DIR, INACCESSIBLE_BLK, INACCESSIBLE_CHR};
use crate::types::DeviceKind;

/// Where device paths are encoded to and resolved from.
///
/// `Default` is the conventional Linux layout. Tests and chroot-style callers
/// point the directories elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceLayout {
    pub char_dir: PathBuf,
    pub block_dir: PathBuf,
    pub inaccessible_char: PathBuf,
    pub inaccessible_block: PathBuf,
}

impl Default for DeviceLayout {
    fn default() -> Self {
        Self {
            char_dir: PathBuf::from(DEV_CHAR_DIR),
            block_dir: PathBuf::from(DEV_BLOCK_DIR),
            inaccessible_char: PathBuf::from(INACCESSIBLE_CHR),
            inaccessible_block: PathBuf::from(INACCESSIBLE_BLK),
        }
    }
}

impl DeviceLayout {
    /// Layout rooted under `root`, mirroring the default relative structure.
    #[must_use]
    pub fn rooted_at(root: &Path) -> Self {
        let d = Self::default();
        let rebase = |p: &Path| root.join(p.strip_prefix("/").unwrap_or(p));
        Self {
            char_dir: rebase(d.char_dir.as_path()),
            block_dir: rebase(d.block_dir.as_path()),
            inaccessible_char: rebase(d.inaccessible_char.as_path()),
            inaccessible_block: rebase(d.inaccessible_block.as_path()),
        }
    }

    #[must_use]
    pub fn dir_for(&self, kind: DeviceKind) -> &Path {
        match kind {
            DeviceKind::Char => &self.char_dir,
            DeviceKind::Block => &self.block_dir,
        }
    }

    #[must_use]
    pub fn inaccessible_for(&self, kind: DeviceKind) -> &Path {
        match kind {
            DeviceKind::Char => &self.inaccessible_char,
            DeviceKind::Block => &self.inaccessible_block,
        }
    }
}
