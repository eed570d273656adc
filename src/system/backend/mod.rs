use async_trait::async_trait;

use super::platform::BackendKind;
use super::snapshot::Usage;
use crate::error::BackendError;

pub mod counter;
pub mod procfs;
pub mod unsupported;

pub use counter::CounterBackend;
pub use procfs::{CPU_SAMPLE_WINDOW, ProcBackend};
pub use unsupported::UnsupportedBackend;

/// Per-dimension result of one backend read. Each dimension fails on its own.
#[derive(Debug)]
pub struct RawUsage {
    pub cpu: Result<f64, BackendError>,
    pub memory: Result<Usage, BackendError>,
    pub disk: Result<Usage, BackendError>,
}

/// OS-specific source of usage figures.
///
/// Implementations hold whatever state their data sources need between calls
/// and must never panic on missing or malformed OS data.
#[async_trait]
pub trait Backend: Send {
    fn name(&self) -> &'static str;

    /// CPU utilization in percent. May suspend for the backend's sampling window.
    async fn read_cpu(&mut self) -> Result<f64, BackendError>;

    fn read_memory(&mut self) -> Result<Usage, BackendError>;

    fn read_disk(&mut self) -> Result<Usage, BackendError>;

    async fn read(&mut self) -> RawUsage {
        let cpu = self.read_cpu().await;
        let memory = self.read_memory();
        let disk = self.read_disk();
        RawUsage { cpu, memory, disk }
    }
}

/// Build the backend for `kind`. Called once, when the sampler is created.
pub fn for_kind(kind: BackendKind) -> Box<dyn Backend> {
    match kind {
        BackendKind::ProcFile => Box::new(ProcBackend::new()),
        BackendKind::Counter if sysinfo::IS_SUPPORTED_SYSTEM => Box::new(CounterBackend::new()),
        BackendKind::Counter | BackendKind::Unsupported => Box::new(UnsupportedBackend),
    }
}
