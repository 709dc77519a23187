//! Device-number data types.
use serde::Serialize;

use crate::constants::{DEVICE_MAJOR_LIMIT, DEVICE_MINOR_LIMIT};

/// Character and block devices live in different node directories, so a number
/// alone does not name a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Char,
    Block,
}

impl DeviceKind {
    /// Device kind encoded in the `S_IFMT` bits of `mode`, if it names a device node.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Option<Self> {
        match mode & 0o170_000 {
            0o020_000 => Some(Self::Char),
            0o060_000 => Some(Self::Block),
            _ => None,
        }
    }

    /// Directory name under `/dev` holding `major:minor` links for this kind.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Block => "block",
        }
    }

    /// `S_IFMT` bits for this kind.
    #[must_use]
    pub const fn mode_bits(self) -> u32 {
        match self {
            Self::Char => 0o020_000,
            Self::Block => 0o060_000,
        }
    }
}

/// A `(major, minor)` pair.
///
/// The fields are wide enough to carry values glibc accepts but the kernel
/// rejects; [`DeviceNumber::is_valid`] applies the kernel's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DeviceNumber {
    pub major: u32,
    pub minor: u32,
}

impl DeviceNumber {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Split a user-space `dev_t`.
    #[must_use]
    pub fn from_dev(dev: u64) -> Self {
        Self {
            major: rustix::fs::major(dev),
            minor: rustix::fs::minor(dev),
        }
    }

    /// Recombine into a user-space `dev_t`.
    #[must_use]
    pub fn to_dev(self) -> u64 {
        rustix::fs::makedev(self.major, self.minor)
    }

    /// Both halves fit the kernel's 12-bit/20-bit split.
    #[must_use]
    pub fn is_valid(self) -> bool {
        major_valid(self.major) && minor_valid(self.minor)
    }

    /// The `0:0` pair used for masked, inaccessible nodes.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.major == 0 && self.minor == 0
    }
}

/// Whether `x` is a major number the Linux kernel can represent.
///
/// Generic over the caller's integer type: negative values fail the conversion
/// instead of relying on a `>= 0` test that is vacuous for unsigned inputs.
pub fn major_valid<T: TryInto<u64>>(x: T) -> bool {
    x.try_into().is_ok_and(|v| v < DEVICE_MAJOR_LIMIT)
}

/// Whether `x` is a minor number the Linux kernel can represent.
pub fn minor_valid<T: TryInto<u64>>(x: T) -> bool {
    x.try_into().is_ok_and(|v| v < DEVICE_MINOR_LIMIT)
}
