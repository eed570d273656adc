use std::path::{Path, PathBuf};

use sysinfo::Disks;

use super::{BackendKind, PlatformExtensions, VolumeSpace};
use crate::error::BackendError;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn backend_kind() -> BackendKind {
        BackendKind::Counter
    }

    fn system_volume() -> PathBuf {
        let drive = std::env::var_os("SystemDrive").unwrap_or_else(|| "C:".into());
        let mut root = PathBuf::from(drive);
        root.push("\\");
        root
    }

    fn volume_space(path: &Path) -> Result<VolumeSpace, BackendError> {
        // Windows has no statvfs; look the volume up by mount point instead.
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == path)
            .map(|disk| VolumeSpace {
                total_bytes: disk.total_space(),
                free_bytes: disk.available_space(),
            })
            .ok_or_else(|| {
                BackendError::unavailable("volume", format!("no volume at {}", path.display()))
            })
    }
}
