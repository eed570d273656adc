use std::path::{Path, PathBuf};

use super::{BackendKind, PlatformExtensions, VolumeSpace};
use crate::error::BackendError;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn backend_kind() -> BackendKind {
        BackendKind::Unsupported
    }

    fn system_volume() -> PathBuf {
        PathBuf::from("/")
    }

    fn volume_space(_path: &Path) -> Result<VolumeSpace, BackendError> {
        Err(BackendError::unavailable("volume", "unsupported platform"))
    }
}
