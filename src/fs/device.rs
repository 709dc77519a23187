//! Device-number paths: `/dev/char/MAJ:MIN` and `/dev/block/MAJ:MIN`.
//!
//! Bounds are the kernel's (12-bit major, 20-bit minor), not glibc's wider
//! `dev_t` split. A number glibc can pack is still rejected here if the
//! kernel could never have produced it.
use std::path::Path;

use crate::config::DeviceLayout;
use crate::types::errors::{DecodeError, EncodeError};
use crate::types::{major_valid, minor_valid, DeviceKind, DeviceNumber};

fn check(number: DeviceNumber) -> Result<(), EncodeError> {
    if !major_valid(number.major) {
        return Err(EncodeError::InvalidMajor(number.major));
    }
    if !minor_valid(number.minor) {
        return Err(EncodeError::InvalidMinor(number.minor));
    }
    Ok(())
}

/// Encode kind and number under `layout`.
///
/// # Errors
///
/// `InvalidMajor`/`InvalidMinor` when a half exceeds the kernel bound.
pub fn encode_path_in(
    layout: &DeviceLayout,
    kind: DeviceKind,
    number: DeviceNumber,
) -> Result<String, EncodeError> {
    check(number)?;
    Ok(format!(
        "{}/{}:{}",
        layout.dir_for(kind).display(),
        number.major,
        number.minor
    ))
}

/// `/dev/char/M:m` or `/dev/block/M:m`.
///
/// # Errors
///
/// See [`encode_path_in`].
pub fn encode_path(kind: DeviceKind, number: DeviceNumber) -> Result<String, EncodeError> {
    encode_path_in(&DeviceLayout::default(), kind, number)
}

/// Encode from a raw `st_mode` and `dev_t`, as found in a `stat` result.
///
/// # Errors
///
/// `NotADevice` if `mode` is neither a character nor a block node, else see [`encode_path`].
pub fn encode_dev_path(mode: u32, dev: u64) -> Result<String, EncodeError> {
    let kind = DeviceKind::from_mode(mode).ok_or(EncodeError::NotADevice)?;
    encode_path(kind, DeviceNumber::from_dev(dev))
}

/// Real device node for kind and number under `layout`.
///
/// Follows the `major:minor` symlink to the node it names. When the link is
/// missing or can't be resolved, the encoded form is returned instead. `0:0`
/// maps to the layout's inaccessible node.
///
/// # Errors
///
/// `InvalidMajor`/`InvalidMinor`, checked before any filesystem access.
pub fn canonical_path_in(
    layout: &DeviceLayout,
    kind: DeviceKind,
    number: DeviceNumber,
) -> Result<String, EncodeError> {
    if number.is_null() {
        return Ok(layout.inaccessible_for(kind).display().to_string());
    }
    let encoded = encode_path_in(layout, kind, number)?;
    let resolved = std::fs::canonicalize(&encoded)
        .ok()
        .and_then(|p| p.into_os_string().into_string().ok());
    Ok(resolved.unwrap_or(encoded))
}

/// # Errors
///
/// See [`canonical_path_in`].
pub fn canonical_path(kind: DeviceKind, number: DeviceNumber) -> Result<String, EncodeError> {
    canonical_path_in(&DeviceLayout::default(), kind, number)
}

fn parse_component(s: &str, whole: &str) -> Result<u64, DecodeError> {
    let canonical = match s.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(u8::is_ascii_digit),
    };
    if !canonical {
        return Err(DecodeError::Malformed(whole.to_string()));
    }
    // All digits, so the only possible failure is overflow.
    Ok(s.parse::<u64>().unwrap_or(u64::MAX))
}

/// Parse `MAJ:MIN` (decimal, no sign, no whitespace, no leading zeros) with kernel bound checks.
///
/// # Errors
///
/// `Malformed` on grammar violations, `OutOfRange` when a half exceeds the kernel bound.
pub fn parse_dev(s: &str) -> Result<DeviceNumber, DecodeError> {
    let (maj, min) = s
        .split_once(':')
        .ok_or_else(|| DecodeError::Malformed(s.to_string()))?;
    let major = parse_component(maj, s)?;
    let minor = parse_component(min, s)?;
    let out_of_range = DecodeError::OutOfRange { major, minor };
    if !major_valid(major) || !minor_valid(minor) {
        return Err(out_of_range);
    }
    match (u32::try_from(major), u32::try_from(minor)) {
        (Ok(major), Ok(minor)) => Ok(DeviceNumber::new(major, minor)),
        _ => Err(out_of_range),
    }
}

/// Inverse of [`encode_path_in`] and of the inaccessible mapping in [`canonical_path_in`].
///
/// # Errors
///
/// `Malformed` for anything outside the layout's grammar, `OutOfRange` for
/// well-formed numbers beyond kernel bounds.
pub fn parse_path_in(
    layout: &DeviceLayout,
    path: &Path,
) -> Result<(DeviceKind, DeviceNumber), DecodeError> {
    // Compared as raw text: `Path` equality and `strip_prefix` would accept
    // `//`, `/./` and trailing `/` spellings that encoding never produces.
    let malformed = || DecodeError::Malformed(path.display().to_string());
    let raw = path.to_str().ok_or_else(malformed)?;
    for kind in [DeviceKind::Char, DeviceKind::Block] {
        if Some(raw) == layout.inaccessible_for(kind).to_str() {
            return Ok((kind, DeviceNumber::default()));
        }
    }
    let (kind, leaf) = [DeviceKind::Char, DeviceKind::Block]
        .into_iter()
        .find_map(|k| {
            let dir = layout.dir_for(k).to_str()?;
            let leaf = raw.strip_prefix(dir)?.strip_prefix('/')?;
            Some((k, leaf))
        })
        .ok_or_else(malformed)?;
    if leaf.contains('/') {
        return Err(malformed());
    }
    Ok((kind, parse_dev(leaf)?))
}

/// # Errors
///
/// See [`parse_path_in`].
pub fn parse_path(path: impl AsRef<Path>) -> Result<(DeviceKind, DeviceNumber), DecodeError> {
    parse_path_in(&DeviceLayout::default(), path.as_ref())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn encodes_conventional_paths() {
        assert_eq!(
            encode_path(DeviceKind::Block, DeviceNumber::new(8, 1)).unwrap(),
            "/dev/block/8:1"
        );
        assert_eq!(
            encode_path(DeviceKind::Char, DeviceNumber::new(1, 3)).unwrap(),
            "/dev/char/1:3"
        );
        assert_eq!(
            encode_dev_path(0o020_666, DeviceNumber::new(4, 64).to_dev()).unwrap(),
            "/dev/char/4:64"
        );
        assert_eq!(encode_dev_path(0o100_644, 0), Err(EncodeError::NotADevice));
    }

    #[test]
    fn kernel_bounds_are_enforced_on_encode() {
        let edge = DeviceNumber::new(4095, 1_048_575);
        assert!(encode_path(DeviceKind::Char, edge).is_ok());
        assert_eq!(
            encode_path(DeviceKind::Char, DeviceNumber::new(4096, 0)),
            Err(EncodeError::InvalidMajor(4096))
        );
        let e = encode_path(DeviceKind::Block, DeviceNumber::new(0, 1_048_576)).unwrap_err();
        assert_eq!(e, EncodeError::InvalidMinor(1_048_576));
        assert_eq!(e.kind(), ErrorKind::OutOfRange);
        // Fits glibc's dev_t, not the kernel's.
        let wide = DeviceNumber::new(u32::MAX, 0);
        assert_eq!(DeviceNumber::from_dev(wide.to_dev()), wide);
        assert!(encode_path(DeviceKind::Block, wide).is_err());
    }

    #[test]
    fn parse_inverts_encode_at_the_edges() {
        for kind in [DeviceKind::Char, DeviceKind::Block] {
            for n in [
                DeviceNumber::new(0, 0),
                DeviceNumber::new(259, 7),
                DeviceNumber::new(4095, 1_048_575),
            ] {
                let p = encode_path(kind, n).unwrap();
                assert_eq!(parse_path(&p).unwrap(), (kind, n));
            }
        }
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        for bad in [
            "/dev/char/8",
            "/dev/char/8:",
            "/dev/char/:1",
            "/dev/char/-1:2",
            "/dev/char/+1:2",
            "/dev/char/ 1:2",
            "/dev/char/1:2:3",
            "/dev/char/1:2/x",
            "/dev/char",
            "/dev/sda",
            "/dev/chars/1:2",
            "relative/1:2",
            "/dev/char/1:2/",
            "/dev/char//1:2",
            "/dev/char/./1:2",
            "/dev/char/001:02",
            "/dev/char/1:00",
            "/run/systemd/inaccessible/chr/",
        ] {
            let e = parse_path(bad).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::Malformed, "{bad}");
        }
    }

    #[test]
    fn parse_reports_out_of_range_for_well_formed_numbers() {
        assert_eq!(
            parse_path("/dev/block/4096:0").unwrap_err(),
            DecodeError::OutOfRange { major: 4096, minor: 0 }
        );
        assert_eq!(
            parse_path("/dev/char/1:1048576").unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            parse_dev("99999999999999999999999:1").unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(parse_dev("0:0").unwrap(), DeviceNumber::new(0, 0));
        assert_eq!(parse_dev("10:0").unwrap(), DeviceNumber::new(10, 0));
    }

    #[test]
    fn inaccessible_nodes_stand_for_null_devices() {
        let n = DeviceNumber::default();
        assert_eq!(
            canonical_path(DeviceKind::Char, n).unwrap(),
            "/run/systemd/inaccessible/chr"
        );
        assert_eq!(
            parse_path("/run/systemd/inaccessible/blk").unwrap(),
            (DeviceKind::Block, n)
        );
    }

    #[test]
    fn canonical_prefers_real_node_and_falls_back() {
        let td = tempfile::tempdir().unwrap();
        let layout = DeviceLayout::rooted_at(td.path());
        std::fs::create_dir_all(&layout.char_dir).unwrap();
        let node = td.path().join("dev/null-ish");
        std::fs::write(&node, b"").unwrap();
        std::os::unix::fs::symlink("../null-ish", layout.char_dir.join("1:3")).unwrap();

        let real = canonical_path_in(&layout, DeviceKind::Char, DeviceNumber::new(1, 3)).unwrap();
        assert_eq!(real, node.canonicalize().unwrap().display().to_string());

        let missing = DeviceNumber::new(1, 5);
        assert_eq!(
            canonical_path_in(&layout, DeviceKind::Char, missing).unwrap(),
            encode_path_in(&layout, DeviceKind::Char, missing).unwrap()
        );
        assert_eq!(
            canonical_path_in(&layout, DeviceKind::Block, DeviceNumber::new(5000, 0)),
            Err(EncodeError::InvalidMajor(5000))
        );
    }

    #[test]
    fn rooted_layout_round_trips() {
        let layout = DeviceLayout::rooted_at(Path::new("/chroot"));
        let n = DeviceNumber::new(8, 16);
        let p = encode_path_in(&layout, DeviceKind::Block, n).unwrap();
        assert_eq!(p, "/chroot/dev/block/8:16");
        assert_eq!(parse_path_in(&layout, Path::new(&p)).unwrap(), (DeviceKind::Block, n));
        assert!(parse_path(&p).is_err());
    }
}
