use chrono::{DateTime, Utc};

use crate::system::snapshot::Snapshot;

/// Sortable UTC timestamp, `2024-05-01 09:30:00Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

/// `CPU: 12.50% | RAM: 1024.00/4096.00 MB | Disk: 100.00/500.00 MB`
pub fn summary_line(snapshot: &Snapshot) -> String {
    format!(
        "CPU: {:.2}% | RAM: {:.2}/{:.2} MB | Disk: {:.2}/{:.2} MB",
        snapshot.cpu_usage_percent,
        snapshot.ram_used_mb,
        snapshot.total_ram_mb,
        snapshot.disk_used_mb,
        snapshot.total_disk_mb
    )
}

pub fn log_line(at: DateTime<Utc>, snapshot: &Snapshot) -> String {
    format!("{} | {}", at.format(TIMESTAMP_FORMAT), summary_line(snapshot))
}
