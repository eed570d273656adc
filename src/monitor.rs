use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::dispatch::{DeliveryReport, Dispatcher};
use crate::scheduler::{RunSummary, Scheduler, TickHandler};
use crate::system::sampler::Sampler;

/// One tick: sample, then deliver to every sink.
pub struct Monitor {
    sampler: Sampler,
    dispatcher: Dispatcher,
    last_report: Option<DeliveryReport>,
}

impl Monitor {
    pub fn new(sampler: Sampler, dispatcher: Dispatcher) -> Self {
        Monitor {
            sampler,
            dispatcher,
            last_report: None,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn last_report(&self) -> Option<&DeliveryReport> {
        self.last_report.as_ref()
    }

    pub async fn run(&mut self, scheduler: &Scheduler, cancel: &CancellationToken) -> RunSummary {
        tracing::info!(
            interval = ?scheduler.interval(),
            backend = self.sampler.backend_name(),
            sinks = ?self.dispatcher.sink_names(),
            "monitor started"
        );
        let summary = scheduler.run(self, cancel).await;
        tracing::info!(
            ticks = summary.completed_ticks,
            stop = ?summary.stop,
            "monitor stopped"
        );
        summary
    }
}

#[async_trait]
impl TickHandler for Monitor {
    async fn on_tick(&mut self, tick: u64) {
        let snapshot = self.sampler.sample().await;
        if !(snapshot.cpu_available() && snapshot.ram_available() && snapshot.disk_available()) {
            tracing::debug!(
                tick,
                cpu = snapshot.cpu_available(),
                ram = snapshot.ram_available(),
                disk = snapshot.disk_available(),
                "snapshot degraded"
            );
        }
        let report = self.dispatcher.deliver(tick, &snapshot).await;
        for outcome in &report.outcomes {
            tracing::debug!(
                tick,
                sink = %outcome.sink,
                ok = outcome.result.is_ok(),
                elapsed = ?outcome.elapsed,
                "sink delivery"
            );
        }
        tracing::debug!(
            tick,
            delivered = report.delivered(),
            failed = report.failed(),
            "tick complete"
        );
        self.last_report = Some(report);
    }
}
