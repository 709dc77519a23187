pub mod classify;
pub mod device;
pub mod kind;
pub mod mount;
pub mod open;
pub mod probe;

pub use classify::{
    classify, fd_is_fs_type, fd_is_network_fs, fd_is_temporary_fs, filesystem_info_fd,
    filesystem_info_path, fs_type_code, is_currently_mounted, is_fs_type, is_network_fs,
    is_read_only_kind, is_temporary_fs, path_is_fs_type, path_is_read_only, path_is_temporary_fs,
    FsTypeField,
};
pub use device::{
    canonical_path, canonical_path_in, encode_dev_path, encode_path, encode_path_in, parse_dev,
    parse_path, parse_path_in,
};
pub use kind::{
    fd_verify_directory, fd_verify_regular, is_dir, is_dir_fd, is_directory, verify_directory,
    verify_regular,
};
pub use mount::{ensure_writable, mount_allows_write, MountInspector, ProcMountsInspector};
pub use open::{fstat_fd, open_path};
pub use probe::{
    files_same, is_empty_or_absent, metadata_identical, null_or_empty, path_is_empty_or_absent,
    probe_extended, probe_extended_at, snapshot_fd, snapshot_path,
};
