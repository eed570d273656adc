use crate::error::BackendError;

const SOURCE: &str = "/proc/stat";

/// Cumulative CPU time counters, in jiffies, from the aggregate `cpu ` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuTimes {
    pub idle: u64,
    pub total: u64,
}

/// Parse the aggregate `cpu ` line out of the full `/proc/stat` text.
pub fn parse_proc_stat(contents: &str) -> Result<CpuTimes, BackendError> {
    let line = contents
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| BackendError::malformed(SOURCE, "no aggregate cpu line"))?;
    parse_cpu_line(line)
}

/// `cpu  user nice system idle iowait irq softirq steal ...`
///
/// Idle time counts `idle + iowait`; total is the sum of every field.
pub fn parse_cpu_line(line: &str) -> Result<CpuTimes, BackendError> {
    let fields = line
        .split_whitespace()
        .skip(1)
        .map(|f| {
            f.parse::<u64>()
                .map_err(|_| BackendError::malformed(SOURCE, format!("bad counter `{f}`")))
        })
        .collect::<Result<Vec<u64>, _>>()?;

    if fields.len() < 5 {
        return Err(BackendError::malformed(
            SOURCE,
            format!("expected at least 5 counters, found {}", fields.len()),
        ));
    }

    let idle = fields[3].saturating_add(fields[4]);
    let total = fields.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
    Ok(CpuTimes { idle, total })
}

/// `100 * (1 - didle / dtotal)`, or 0% when no time elapsed between reads.
pub fn usage_between(previous: CpuTimes, current: CpuTimes) -> f64 {
    let total_delta = current.total.saturating_sub(previous.total);
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = current.idle.saturating_sub(previous.idle).min(total_delta);
    100.0 * (1.0 - idle_delta as f64 / total_delta as f64)
}

/// Holds the previous counter reading so successive observations yield a delta.
#[derive(Clone, Debug, Default)]
pub struct CpuTracker {
    previous: Option<CpuTimes>,
}

impl CpuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already known reading.
    pub fn with_previous(previous: CpuTimes) -> Self {
        Self {
            previous: Some(previous),
        }
    }

    pub fn previous(&self) -> Option<CpuTimes> {
        self.previous
    }

    /// Record `current` and return usage since the prior reading, or `None`
    /// when there is no prior reading yet.
    pub fn observe(&mut self, current: CpuTimes) -> Option<f64> {
        let usage = self.previous.map(|prev| usage_between(prev, current));
        self.previous = Some(current);
        usage
    }
}
