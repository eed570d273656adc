use std::path::{Path, PathBuf};

use crate::error::BackendError;

/// Which sampling strategy the running OS supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Cumulative counters in `/proc` text files, CPU via two timed reads.
    ProcFile,
    /// Continuously updated OS utilization counters.
    Counter,
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeSpace {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl VolumeSpace {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}

pub trait PlatformExtensions {
    fn backend_kind() -> BackendKind;
    /// Mount point of the volume the OS boots from.
    fn system_volume() -> PathBuf;
    fn volume_space(path: &Path) -> Result<VolumeSpace, BackendError>;
}

#[cfg(unix)]
mod unix;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod other;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use other as platform_impl;

pub fn backend_kind() -> BackendKind {
    platform_impl::Platform::backend_kind()
}

pub fn system_volume() -> PathBuf {
    platform_impl::Platform::system_volume()
}

pub fn volume_space(path: &Path) -> Result<VolumeSpace, BackendError> {
    platform_impl::Platform::volume_space(path)
}
