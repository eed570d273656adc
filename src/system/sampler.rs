use std::sync::Arc;

use tracing::Instrument;

use super::backend::{self, Backend, RawUsage};
use super::platform;
use super::snapshot::{CPU_UNAVAILABLE, Snapshot, Usage, normalize_cpu};
use crate::report::{Dimension, Incident, Reporter};

/// Owns the platform backend and turns its raw reads into snapshots.
pub struct Sampler {
    backend: Box<dyn Backend>,
    reporter: Arc<dyn Reporter>,
}

impl Sampler {
    /// Pick the backend for the running OS. Done once; never re-detected.
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        let kind = platform::backend_kind();
        let backend = backend::for_kind(kind);
        tracing::info!(?kind, backend = backend.name(), "sampler backend selected");
        Self::with_backend(backend, reporter)
    }

    pub fn with_backend(backend: Box<dyn Backend>, reporter: Arc<dyn Reporter>) -> Self {
        Sampler { backend, reporter }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn sample(&mut self) -> Snapshot {
        let span = tracing::debug_span!("sampler.sample", backend = self.backend.name());
        let raw = self.backend.read().instrument(span).await;
        self.build_snapshot(raw)
    }

    fn build_snapshot(&self, raw: RawUsage) -> Snapshot {
        let cpu = match raw.cpu {
            Ok(percent) => normalize_cpu(percent),
            Err(error) => {
                self.report(Dimension::Cpu, &error);
                CPU_UNAVAILABLE
            }
        };
        let memory = self.usage_or_zero(Dimension::Memory, raw.memory);
        let disk = self.usage_or_zero(Dimension::Disk, raw.disk);

        Snapshot {
            cpu_usage_percent: cpu,
            ram_used_mb: memory.used_mb,
            total_ram_mb: memory.total_mb,
            disk_used_mb: disk.used_mb,
            total_disk_mb: disk.total_mb,
        }
    }

    fn usage_or_zero(
        &self,
        dimension: Dimension,
        result: Result<Usage, crate::error::BackendError>,
    ) -> Usage {
        match result {
            Ok(usage) => usage.normalized(),
            Err(error) => {
                self.report(dimension, &error);
                Usage::ZERO
            }
        }
    }

    fn report(&self, dimension: Dimension, error: &crate::error::BackendError) {
        self.reporter.report(Incident::Backend {
            backend: self.backend.name(),
            dimension,
            error,
        });
    }
}
