//! Fixed-interval refresh loop.

use std::time::Duration;

use tracing::info;

use crate::brain::SignalBrain;

/// Drives the brain's refresh on a fixed cadence. The first cycle
/// runs immediately.
pub struct BrainScheduler {
    interval: Duration,
}

impl BrainScheduler {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Runs forever; cancel the future to stop (the binary races it
    /// against ctrl-c).
    pub async fn run(&self, mut brain: SignalBrain, tickers: Vec<String>) {
        info!(interval_secs = self.interval.as_secs(), "Scheduler started");
        let mut ticks = tokio::time::interval(self.interval);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            let signals = brain.refresh(&tickers).await;
            info!(signals = signals.len(), "Refresh cycle complete");
        }
    }
}
