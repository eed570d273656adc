use std::path::{Path, PathBuf};

use super::{BackendKind, PlatformExtensions, VolumeSpace};
use crate::error::BackendError;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn backend_kind() -> BackendKind {
        // host_statistics backed counters via sysinfo
        BackendKind::Counter
    }

    fn system_volume() -> PathBuf {
        PathBuf::from("/")
    }

    fn volume_space(path: &Path) -> Result<VolumeSpace, BackendError> {
        super::unix::statvfs_space(path)
    }
}
