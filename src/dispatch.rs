//! Fan-out of one snapshot to every registered sink.
//!
//! Deliveries inside a tick run concurrently and are each bounded by a
//! timeout. `deliver` only returns once every sink has finished or been
//! abandoned, so a sink never sees tick N+1 while still handling tick N.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::join_all;
use tokio::time::Instant;

use crate::error::SinkError;
use crate::report::{Incident, Reporter};
use crate::system::snapshot::Snapshot;

/// A consumer of snapshots. Any state it needs (file handle, HTTP client)
/// belongs to the sink itself.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    async fn handle(&self, snapshot: &Snapshot) -> Result<(), SinkError>;
}

#[derive(Debug)]
pub struct SinkOutcome {
    pub sink: String,
    pub result: Result<(), SinkError>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct DeliveryReport {
    pub tick: u64,
    /// One entry per sink, in registration order.
    pub outcomes: Vec<SinkOutcome>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

pub struct Dispatcher {
    sinks: Vec<Arc<dyn Sink>>,
    timeout: Duration,
    reporter: Arc<dyn Reporter>,
}

impl Dispatcher {
    pub fn new(timeout: Duration, reporter: Arc<dyn Reporter>) -> Self {
        Dispatcher {
            sinks: Vec::new(),
            timeout,
            reporter,
        }
    }

    /// Add a sink. Registrations are not de-duplicated.
    pub fn register(&mut self, sink: Arc<dyn Sink>) {
        tracing::debug!(sink = sink.name(), "sink registered");
        self.sinks.push(sink);
    }

    pub fn with_sinks(mut self, sinks: impl IntoIterator<Item = Arc<dyn Sink>>) -> Self {
        for sink in sinks {
            self.register(sink);
        }
        self
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub async fn deliver(&self, tick: u64, snapshot: &Snapshot) -> DeliveryReport {
        let deliveries = self
            .sinks
            .iter()
            .map(|sink| self.deliver_one(sink.as_ref(), snapshot));
        let outcomes = join_all(deliveries).await;

        for outcome in &outcomes {
            if let Err(error) = &outcome.result {
                self.reporter.report(Incident::Sink {
                    sink: &outcome.sink,
                    tick,
                    error,
                });
            }
        }

        DeliveryReport { tick, outcomes }
    }

    async fn deliver_one(&self, sink: &dyn Sink, snapshot: &Snapshot) -> SinkOutcome {
        let started = Instant::now();
        let handled = AssertUnwindSafe(sink.handle(snapshot)).catch_unwind();
        let result = match tokio::time::timeout(self.timeout, handled).await {
            Ok(Ok(result)) => result,
            Ok(Err(_panic)) => Err(SinkError::Panicked),
            Err(_elapsed) => Err(SinkError::TimedOut(self.timeout)),
        };
        SinkOutcome {
            sink: sink.name().to_string(),
            result,
            elapsed: started.elapsed(),
        }
    }
}
