// src/poll/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::poll::types::SampleSource;
use crate::store::SeriesStore;

#[derive(Clone, Copy, Debug)]
pub struct PollSchedulerCfg {
    pub interval_secs: u64,
    pub last_n: u32,
}

/// Spawn the fixed-period poll loop. The loop body awaits the full cycle, so
/// cycles never overlap; a tick that lands while the prior cycle is still
/// running is skipped rather than queued (`MissedTickBehavior::Skip`).
pub fn spawn_poll_scheduler(
    cfg: PollSchedulerCfg,
    source: Arc<dyn SampleSource>,
    store: Arc<SeriesStore>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(cfg.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let report = crate::poll::run_once(source.as_ref(), &store, cfg.last_n).await;
            tracing::info!(
                target: "poll",
                timestamps = report.timestamps,
                failures = report.failures.len(),
                applied = report.applied,
                "poll tick"
            );
        }
    })
}
