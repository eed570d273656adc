use serde::Serialize;

/// CPU value reported when the backend could not measure utilization.
pub const CPU_UNAVAILABLE: f64 = -1.0;

/// One normalized resource-usage reading. Built fresh by the sampler on every
/// tick and handed read-only to every sink.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub cpu_usage_percent: f64,
    pub ram_used_mb: f64,
    pub total_ram_mb: f64,
    pub disk_used_mb: f64,
    pub total_disk_mb: f64,
}

impl Snapshot {
    /// Every dimension unavailable.
    pub const UNAVAILABLE: Snapshot = Snapshot {
        cpu_usage_percent: CPU_UNAVAILABLE,
        ram_used_mb: 0.0,
        total_ram_mb: 0.0,
        disk_used_mb: 0.0,
        total_disk_mb: 0.0,
    };

    pub fn cpu_available(&self) -> bool {
        self.cpu_usage_percent >= 0.0
    }

    pub fn ram_available(&self) -> bool {
        self.total_ram_mb > 0.0
    }

    pub fn disk_available(&self) -> bool {
        self.total_disk_mb > 0.0
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::UNAVAILABLE
    }
}

/// A used/total pair in megabytes, as reported by a backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Usage {
    pub used_mb: f64,
    pub total_mb: f64,
}

impl Usage {
    pub const ZERO: Usage = Usage {
        used_mb: 0.0,
        total_mb: 0.0,
    };

    pub fn from_bytes(used: u64, total: u64) -> Self {
        Usage {
            used_mb: bytes_to_mb(used),
            total_mb: bytes_to_mb(total),
        }
    }

    pub fn from_kib(used: u64, total: u64) -> Self {
        Usage {
            used_mb: used as f64 / 1024.0,
            total_mb: total as f64 / 1024.0,
        }
    }

    /// Clamp into a pair that satisfies `0 <= used <= total`. A pair that
    /// cannot be repaired (non-finite, or no total) collapses to `0/0`.
    pub fn normalized(self) -> Usage {
        if !self.used_mb.is_finite() || !self.total_mb.is_finite() || self.total_mb <= 0.0 {
            return Usage::ZERO;
        }
        Usage {
            used_mb: self.used_mb.clamp(0.0, self.total_mb),
            total_mb: self.total_mb,
        }
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Clamp a CPU percentage into `0..=100`, mapping non-finite or negative input
/// to the unavailable sentinel.
pub fn normalize_cpu(percent: f64) -> f64 {
    if !percent.is_finite() || percent < 0.0 {
        CPU_UNAVAILABLE
    } else {
        percent.min(100.0)
    }
}
