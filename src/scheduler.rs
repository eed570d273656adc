use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Work performed on every tick.
#[async_trait]
pub trait TickHandler: Send {
    async fn on_tick(&mut self, tick: u64);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    TickLimit,
    /// Cancelled mid-tick and the tick outlived the shutdown grace period.
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub completed_ticks: u64,
    pub stop: StopReason,
}

/// Fixed-delay tick loop: the next tick starts `interval` after the previous
/// one finished. Ticks never overlap.
#[derive(Clone, Debug)]
pub struct Scheduler {
    interval: Duration,
    shutdown_grace: Duration,
    max_ticks: Option<u64>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Scheduler {
            interval,
            shutdown_grace: Duration::from_secs(5),
            max_ticks: None,
        }
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Stop on its own after `max` ticks.
    pub fn with_max_ticks(mut self, max: u64) -> Self {
        self.max_ticks = Some(max);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn limit_reached(&self, completed: u64) -> bool {
        self.max_ticks.is_some_and(|max| completed >= max)
    }

    pub async fn run<H>(&self, handler: &mut H, cancel: &CancellationToken) -> RunSummary
    where
        H: TickHandler + ?Sized,
    {
        let mut completed = 0;

        loop {
            if cancel.is_cancelled() {
                return summary(completed, StopReason::Cancelled);
            }
            if self.limit_reached(completed) {
                return summary(completed, StopReason::TickLimit);
            }

            let tick_number = completed + 1;
            let mut tick = handler.on_tick(tick_number);
            let interrupted = tokio::select! {
                _ = &mut tick => false,
                _ = cancel.cancelled() => true,
            };

            if interrupted {
                tracing::info!(tick = tick_number, grace = ?self.shutdown_grace, "cancelled mid-tick; letting it finish");
                if tokio::time::timeout(self.shutdown_grace, &mut tick)
                    .await
                    .is_err()
                {
                    tracing::warn!(tick = tick_number, "tick abandoned after shutdown grace elapsed");
                    return summary(completed, StopReason::Abandoned);
                }
                return summary(tick_number, StopReason::Cancelled);
            }

            completed = tick_number;
            if self.limit_reached(completed) {
                return summary(completed, StopReason::TickLimit);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => return summary(completed, StopReason::Cancelled),
            }
        }
    }
}

fn summary(completed_ticks: u64, stop: StopReason) -> RunSummary {
    RunSummary {
        completed_ticks,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        fired_at: Vec<(u64, Instant)>,
        work: Duration,
        cancel_on: Option<(u64, CancellationToken)>,
    }

    #[async_trait]
    impl TickHandler for Recorder {
        async fn on_tick(&mut self, tick: u64) {
            self.fired_at.push((tick, Instant::now()));
            if let Some((at, token)) = &self.cancel_on
                && *at == tick
            {
                token.cancel();
            }
            tokio::time::sleep(self.work).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_between_ticks() {
        let scheduler = Scheduler::new(Duration::from_secs(1)).with_max_ticks(3);
        let mut recorder = Recorder {
            work: Duration::from_millis(300),
            ..Default::default()
        };

        let summary = scheduler.run(&mut recorder, &CancellationToken::new()).await;

        assert_eq!(
            summary,
            RunSummary {
                completed_ticks: 3,
                stop: StopReason::TickLimit
            }
        );
        let gaps: Vec<Duration> = recorder
            .fired_at
            .windows(2)
            .map(|w| w[1].1 - w[0].1)
            .collect();
        // 300ms of work plus the full 1s delay; no drift correction.
        assert_eq!(gaps.len(), 2);
        for gap in gaps {
            assert!(gap >= Duration::from_millis(1300), "gap was {gap:?}");
            assert!(gap < Duration::from_millis(1400), "gap was {gap:?}");
        }
        let ticks: Vec<u64> = recorder.fired_at.iter().map(|(t, _)| *t).collect();
        assert_eq!(ticks, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_runs_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let mut recorder = Recorder::default();

        let summary = Scheduler::new(Duration::from_secs(1))
            .run(&mut recorder, &token)
            .await;

        assert_eq!(summary.completed_ticks, 0);
        assert_eq!(summary.stop, StopReason::Cancelled);
        assert!(recorder.fired_at.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_tick_finishes_within_grace() {
        let token = CancellationToken::new();
        let mut recorder = Recorder {
            work: Duration::from_millis(500),
            cancel_on: Some((2, token.clone())),
            ..Default::default()
        };

        let summary = Scheduler::new(Duration::from_secs(1))
            .with_shutdown_grace(Duration::from_secs(2))
            .run(&mut recorder, &token)
            .await;

        assert_eq!(
            summary,
            RunSummary {
                completed_ticks: 2,
                stop: StopReason::Cancelled
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_tick_abandoned_after_grace() {
        let token = CancellationToken::new();
        let mut recorder = Recorder {
            work: Duration::from_secs(60),
            cancel_on: Some((1, token.clone())),
            ..Default::default()
        };

        let summary = Scheduler::new(Duration::from_secs(1))
            .with_shutdown_grace(Duration::from_millis(100))
            .run(&mut recorder, &token)
            .await;

        assert_eq!(
            summary,
            RunSummary {
                completed_ticks: 0,
                stop: StopReason::Abandoned
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_delay_stops_promptly() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            canceller.cancel();
        });

        let mut recorder = Recorder::default();
        let started = Instant::now();
        let summary = Scheduler::new(Duration::from_secs(10))
            .run(&mut recorder, &token)
            .await;

        assert_eq!(summary.completed_ticks, 1);
        assert_eq!(summary.stop, StopReason::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
