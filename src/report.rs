//! Single reporting channel for the non-fatal errors raised inside a tick.
//!
//! Components receive an `Arc<dyn Reporter>` instead of logging inline, so
//! tests can observe what went wrong and production routes it to `tracing`.

use std::fmt;
use std::sync::Mutex;

use crate::error::{BackendError, SinkError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    Cpu,
    Memory,
    Disk,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Cpu => "cpu",
            Dimension::Memory => "memory",
            Dimension::Disk => "disk",
        };
        f.write_str(name)
    }
}

pub enum Incident<'a> {
    Backend {
        backend: &'static str,
        dimension: Dimension,
        error: &'a BackendError,
    },
    Sink {
        sink: &'a str,
        tick: u64,
        error: &'a SinkError,
    },
}

pub trait Reporter: Send + Sync {
    fn report(&self, incident: Incident<'_>);
}

/// Reports incidents as `tracing` warnings.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, incident: Incident<'_>) {
        match incident {
            Incident::Backend {
                backend,
                dimension,
                error,
            } => {
                tracing::warn!(backend, %dimension, %error, "sample dimension unavailable");
            }
            Incident::Sink { sink, tick, error } => {
                tracing::warn!(sink, tick, %error, "sink delivery failed");
            }
        }
    }
}

/// Keeps every incident as a rendered line. Handy for tests and for
/// embedding the engine where `tracing` is not wired up.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, incident: Incident<'_>) {
        let line = match incident {
            Incident::Backend {
                backend,
                dimension,
                error,
            } => format!("{backend}/{dimension}: {error}"),
            Incident::Sink { sink, tick, error } => format!("{sink}#{tick}: {error}"),
        };
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}
