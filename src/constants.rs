//! Shared crate-wide constants for statguard.
//!
//! Centralizes filesystem magic values, kernel device-number widths and the
//! well-known paths consulted by the probes. Magic values are the 32-bit
//! values from `linux/magic.h`; compare them only through
//! [`crate::fs::fs_type_code`].

/// Bits of major number space the kernel supports (`MINORBITS` complement in `linux/kdev_t.h`).
///
/// glibc's `dev_t` splits 64 bits differently and carries larger values.
/// These widths are Linux-specific.
pub const DEVICE_MAJOR_BITS: u32 = 12;

/// Bits of minor number space the kernel supports (`MINORBITS`).
pub const DEVICE_MINOR_BITS: u32 = 20;

/// Exclusive upper bound for a kernel-valid major number.
pub const DEVICE_MAJOR_LIMIT: u64 = 1 << DEVICE_MAJOR_BITS;

/// Exclusive upper bound for a kernel-valid minor number.
pub const DEVICE_MINOR_LIMIT: u64 = 1 << DEVICE_MINOR_BITS;

/// Directory holding `major:minor` symlinks to character device nodes.
pub const DEV_CHAR_DIR: &str = "/dev/char";

/// Directory holding `major:minor` symlinks to block device nodes.
pub const DEV_BLOCK_DIR: &str = "/dev/block";

/// Inaccessible character node used to mask `0:0` character devices.
pub const INACCESSIBLE_CHR: &str = "/run/systemd/inaccessible/chr";

/// Inaccessible block node used to mask `0:0` block devices.
pub const INACCESSIBLE_BLK: &str = "/run/systemd/inaccessible/blk";

/// Mount point probed by [`crate::fs::is_currently_mounted`].
pub const PROC_ROOT: &str = "/proc/";

/// Mount table read by the production mount inspector.
pub const PROC_SELF_MOUNTS: &str = "/proc/self/mounts";

// Temporary, in-memory filesystems.
pub const TMPFS_MAGIC: u32 = 0x0102_1994;
pub const RAMFS_MAGIC: u32 = 0x8584_58f6;

// Network-backed filesystems.
pub const CIFS_MAGIC_NUMBER: u32 = 0xFF53_4D42;
pub const SMB2_MAGIC_NUMBER: u32 = 0xFE53_4D42;
pub const SMB_SUPER_MAGIC: u32 = 0x517B;
pub const CODA_SUPER_MAGIC: u32 = 0x7375_7245;
pub const NCP_SUPER_MAGIC: u32 = 0x564c;
pub const NFS_SUPER_MAGIC: u32 = 0x6969;
pub const V9FS_MAGIC: u32 = 0x0102_1997;
pub const AFS_SUPER_MAGIC: u32 = 0x5346_414F;
pub const OCFS2_SUPER_MAGIC: u32 = 0x7461_636f;

// Filesystems that cannot be written to regardless of mount flags.
pub const SQUASHFS_MAGIC: u32 = 0x7371_7368;
pub const ISOFS_SUPER_MAGIC: u32 = 0x9660;
pub const CRAMFS_MAGIC: u32 = 0x28cd_3d45;
pub const EROFS_SUPER_MAGIC_V1: u32 = 0xE0F5_E1E2;
pub const ROMFS_MAGIC: u32 = 0x7275;

// Misc.
pub const PROC_SUPER_MAGIC: u32 = 0x9fa0;
pub const EXT4_SUPER_MAGIC: u32 = 0xEF53;
pub const BTRFS_SUPER_MAGIC: u32 = 0x9123_683E;
pub const XFS_SUPER_MAGIC: u32 = 0x5846_5342;

/// In-memory filesystems whose contents vanish on reboot.
pub const TEMPORARY_FS_MAGICS: &[u32] = &[TMPFS_MAGIC, RAMFS_MAGIC];

/// Filesystems whose backing store lives on another host.
pub const NETWORK_FS_MAGICS: &[u32] = &[
    CIFS_MAGIC_NUMBER,
    SMB2_MAGIC_NUMBER,
    CODA_SUPER_MAGIC,
    NCP_SUPER_MAGIC,
    NFS_SUPER_MAGIC,
    SMB_SUPER_MAGIC,
    V9FS_MAGIC,
    AFS_SUPER_MAGIC,
    OCFS2_SUPER_MAGIC,
];

/// Filesystem formats with no write support at all.
pub const READ_ONLY_FS_MAGICS: &[u32] = &[
    SQUASHFS_MAGIC,
    ISOFS_SUPER_MAGIC,
    CRAMFS_MAGIC,
    EROFS_SUPER_MAGIC_V1,
    ROMFS_MAGIC,
];
