use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::Backend;
use crate::error::BackendError;
use crate::system::cpu::{CpuTimes, CpuTracker, parse_proc_stat};
use crate::system::platform;
use crate::system::snapshot::Usage;

/// Gap between the two `/proc/stat` reads of one CPU measurement.
pub const CPU_SAMPLE_WINDOW: Duration = Duration::from_millis(1500);

const MEMINFO: &str = "/proc/meminfo";

/// Reads cumulative counters out of `/proc` and the root volume via `statvfs`.
pub struct ProcBackend {
    proc_root: PathBuf,
    disk_path: PathBuf,
    window: Duration,
    cpu: CpuTracker,
}

impl Default for ProcBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcBackend {
    pub fn new() -> Self {
        Self::with_paths("/proc", platform::system_volume())
    }

    /// Read pseudo-files under `proc_root` and measure the volume holding
    /// `disk_path`.
    pub fn with_paths(proc_root: impl Into<PathBuf>, disk_path: impl Into<PathBuf>) -> Self {
        ProcBackend {
            proc_root: proc_root.into(),
            disk_path: disk_path.into(),
            window: CPU_SAMPLE_WINDOW,
            cpu: CpuTracker::new(),
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_cpu_tracker(mut self, tracker: CpuTracker) -> Self {
        self.cpu = tracker;
        self
    }

    pub fn cpu_tracker(&self) -> &CpuTracker {
        &self.cpu
    }

    fn read_pseudo_file(&self, name: &str, source: &'static str) -> Result<String, BackendError> {
        std::fs::read_to_string(self.proc_root.join(name))
            .map_err(|e| BackendError::from_io(source, &e))
    }

    fn read_cpu_times(&self) -> Result<CpuTimes, BackendError> {
        let contents = self.read_pseudo_file("stat", "/proc/stat")?;
        parse_proc_stat(&contents)
    }
}

#[async_trait]
impl Backend for ProcBackend {
    fn name(&self) -> &'static str {
        "proc"
    }

    async fn read_cpu(&mut self) -> Result<f64, BackendError> {
        let first = self.read_cpu_times()?;
        self.cpu.observe(first);
        tokio::time::sleep(self.window).await;
        let second = self.read_cpu_times()?;
        Ok(self.cpu.observe(second).unwrap_or(0.0))
    }

    fn read_memory(&mut self) -> Result<Usage, BackendError> {
        let contents = self.read_pseudo_file("meminfo", MEMINFO)?;
        parse_meminfo(&contents)
    }

    fn read_disk(&mut self) -> Result<Usage, BackendError> {
        let space = platform::volume_space(&self.disk_path)?;
        Ok(Usage::from_bytes(space.used_bytes(), space.total_bytes))
    }
}

/// Used memory is `MemTotal - MemAvailable`; both come from the same pass.
pub fn parse_meminfo(contents: &str) -> Result<Usage, BackendError> {
    let mut total_kib = None;
    let mut available_kib = None;

    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total_kib = Some(parse_kib(rest)?);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available_kib = Some(parse_kib(rest)?);
        }
        if total_kib.is_some() && available_kib.is_some() {
            break;
        }
    }

    let total = total_kib.ok_or_else(|| BackendError::malformed(MEMINFO, "missing MemTotal"))?;
    let available =
        available_kib.ok_or_else(|| BackendError::malformed(MEMINFO, "missing MemAvailable"))?;
    if total == 0 {
        return Err(BackendError::malformed(MEMINFO, "MemTotal is zero"));
    }

    Ok(Usage::from_kib(total.saturating_sub(available), total))
}

fn parse_kib(value: &str) -> Result<u64, BackendError> {
    let number = value
        .split_whitespace()
        .next()
        .ok_or_else(|| BackendError::malformed(MEMINFO, "empty value"))?;
    number
        .parse()
        .map_err(|_| BackendError::malformed(MEMINFO, format!("bad value `{number}`")))
}
