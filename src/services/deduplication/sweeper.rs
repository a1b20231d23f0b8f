//! Background sweep of idle notification entries.
//!
//! The sweep only bounds memory. It runs on its own schedule, takes the
//! tracker lock for one `retain` pass per tick, and is owned by whoever
//! spawned it: cancelled on [`SweepTask::shutdown`] or on drop.

use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::tracker::NotificationTracker;

/// Smallest accepted sweep period; `tokio::time::interval` rejects zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running sweep task.
///
/// # Example
///
/// ```rust,ignore
/// use sitewatch::{NotificationTracker, SweepTask};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let tracker = Arc::new(NotificationTracker::default());
/// let sweeper = SweepTask::spawn(
///     Arc::clone(&tracker),
///     Duration::from_secs(300),
///     Duration::from_secs(1800),
/// )?;
///
/// // ... serve requests ...
///
/// sweeper.shutdown().await;
/// ```
#[derive(Debug)]
pub struct SweepTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SweepTask {
    /// Spawns the sweep on the current tokio runtime.
    ///
    /// The first sweep runs one full `interval` after spawning.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside a tokio runtime.
    pub fn spawn(
        tracker: Arc<NotificationTracker>,
        interval: Duration,
        retention: Duration,
    ) -> Result<Self> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|e| Error::OperationFailed {
                operation: "spawn_sweep_task".to_string(),
                cause: e.to_string(),
            })?;

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let interval = interval.max(MIN_SWEEP_INTERVAL);

        let handle = runtime.spawn(run_sweeps(tracker, interval, retention, token));

        tracing::debug!(
            interval_secs = interval.as_secs(),
            retention_secs = retention.as_secs(),
            "Started notification sweep task"
        );

        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// Returns true while the task has not finished.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the sweep and waits for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Notification sweep task ended abnormally");
            }
        }
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_sweeps(
    tracker: Arc<NotificationTracker>,
    interval: Duration,
    retention: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("Notification sweep task stopping");
                break;
            }
            _ = ticker.tick() => {
                let report = tracker.sweep(retention);
                metrics::counter!("notification_dedup_sweeps_total").increment(1);
                tracing::trace!(
                    removed = report.removed,
                    remaining = report.remaining,
                    "Notification sweep tick"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViolationCategory;
    use crate::services::deduplication::ManualClock;

    const INTERVAL: Duration = Duration::from_secs(300);
    const RETENTION: Duration = Duration::from_secs(1800);

    /// Tracker with one entry already idle past the retention threshold.
    fn stale_tracker() -> Arc<NotificationTracker> {
        let clock = ManualClock::new(0);
        let tracker = Arc::new(NotificationTracker::with_clock(
            Duration::from_secs(10),
            Arc::new(clock.clone()),
        ));
        tracker.should_send(ViolationCategory::Ppe, "Alice", "Gate1");
        clock.advance(Duration::from_secs(31 * 60));
        tracker
    }

    #[test]
    fn test_spawn_outside_runtime_fails() {
        let tracker = Arc::new(NotificationTracker::default());
        let result = SweepTask::spawn(tracker, INTERVAL, RETENTION);
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_sweep_waits_one_interval() {
        let tracker = stale_tracker();
        let task = SweepTask::spawn(Arc::clone(&tracker), INTERVAL, RETENTION).unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(tracker.len(), 1);

        tokio::time::sleep(INTERVAL).await;
        assert!(tracker.is_empty());

        task.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_sweeping() {
        let tracker = stale_tracker();
        let task = SweepTask::spawn(Arc::clone(&tracker), INTERVAL, RETENTION).unwrap();
        assert!(task.is_running());

        task.shutdown().await;

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(tracker.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let tracker = stale_tracker();
        let task = SweepTask::spawn(Arc::clone(&tracker), INTERVAL, RETENTION).unwrap();

        drop(task);

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(tracker.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let tracker = stale_tracker();
        let task = SweepTask::spawn(Arc::clone(&tracker), Duration::ZERO, RETENTION).unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(tracker.is_empty());

        task.shutdown().await;
    }
}
