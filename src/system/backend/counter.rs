use async_trait::async_trait;
use sysinfo::{Disks, System};

use super::Backend;
use crate::error::BackendError;
use crate::system::platform;
use crate::system::snapshot::Usage;

/// Reads the OS's continuously updated utilization counters through sysinfo.
pub struct CounterBackend {
    sys: System,
}

impl Default for CounterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterBackend {
    pub fn new() -> Self {
        let mut sys = System::new();
        // The first refresh only primes the counter; usage is measured
        // against it on the next read.
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        CounterBackend { sys }
    }
}

#[async_trait]
impl Backend for CounterBackend {
    fn name(&self) -> &'static str {
        "counter"
    }

    async fn read_cpu(&mut self) -> Result<f64, BackendError> {
        self.sys.refresh_cpu_usage();
        if self.sys.cpus().is_empty() {
            return Err(BackendError::unavailable("cpu counter", "no processors reported"));
        }
        Ok(f64::from(self.sys.global_cpu_usage()))
    }

    fn read_memory(&mut self) -> Result<Usage, BackendError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(BackendError::unavailable("memory query", "total memory is zero"));
        }
        let available = self.sys.available_memory();
        Ok(Usage::from_bytes(total.saturating_sub(available), total))
    }

    fn read_disk(&mut self) -> Result<Usage, BackendError> {
        let root = platform::system_volume();
        match platform::volume_space(&root) {
            Ok(space) if space.total_bytes > 0 => {
                Ok(Usage::from_bytes(space.used_bytes(), space.total_bytes))
            }
            Ok(_) => first_fixed_disk(),
            Err(error) => {
                tracing::debug!(root = %root.display(), %error, "system volume lookup failed");
                first_fixed_disk()
            }
        }
    }
}

fn first_fixed_disk() -> Result<Usage, BackendError> {
    let disks = Disks::new_with_refreshed_list();
    let primary = disks
        .list()
        .iter()
        .find(|disk| !disk.is_removable() && disk.total_space() > 0)
        .ok_or_else(|| BackendError::unavailable("volume", "no fixed volume found"))?;
    let total = primary.total_space();
    let used = total.saturating_sub(primary.available_space());
    Ok(Usage::from_bytes(used, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_do_not_panic_on_host() {
        let mut backend = CounterBackend::new();
        let raw = backend.read().await;
        if let Ok(cpu) = raw.cpu {
            assert!(cpu >= 0.0);
        }
        if let Ok(memory) = raw.memory {
            assert!(memory.used_mb <= memory.total_mb);
        }
        if let Ok(disk) = raw.disk {
            assert!(disk.used_mb <= disk.total_mb);
        }
    }

    #[test]
    fn disk_reports_the_system_volume() {
        let Ok(space) = platform::volume_space(&platform::system_volume()) else {
            return;
        };
        if space.total_bytes == 0 {
            return;
        }
        let disk = CounterBackend::new().read_disk().unwrap();
        assert_eq!(disk.total_mb, Usage::from_bytes(0, space.total_bytes).total_mb);
    }
}
