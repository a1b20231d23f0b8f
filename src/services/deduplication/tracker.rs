//! Recent notification tracker.
//!
//! Suppresses alerts whose key was already allowed through within the
//! suppression window. Holds one timestamp per key in an in-memory map.

use crate::models::{ViolationCategory, ViolationEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::instrument;

use super::clock::{Clock, MonotonicClock, duration_to_millis};
use super::config::DEFAULT_WINDOW;
use super::key::EventKey;
use super::types::{NotificationDecision, NotificationGate, SweepReport};

/// Converts usize to f64 for metrics, capping at `u32::MAX`.
#[inline]
fn usize_to_f64(value: usize) -> f64 {
    let capped = u32::try_from(value).unwrap_or(u32::MAX);
    f64::from(capped)
}

/// Last allowed time for one key, and the widest window it was judged by.
#[derive(Debug, Clone, Copy)]
struct Entry {
    last_allowed: u64,
    window_ms: u64,
}

/// Tracker for recently allowed notifications.
///
/// # How it works
///
/// 1. Maps each normalized [`EventKey`] to the time it was last *allowed*
/// 2. A check inside the window returns `Suppressed` and leaves the entry alone
/// 3. A check for an unknown key, or one whose window has elapsed, returns
///    `Allowed` and stamps the entry with the current time
/// 4. [`sweep`](Self::sweep) evicts entries idle past a retention threshold,
///    except those still inside the widest window they were checked with
///
/// Duplicates never refresh the timestamp, so a steady stream of duplicates
/// cannot postpone the next alert: the spacing between two allowed alerts for
/// one key is exactly the window.
///
/// # Thread Safety
///
/// The whole read-compare-write runs under one `Mutex`, so of several racing
/// checks for the same key within a window exactly one is allowed.
///
/// # Lock Poisoning
///
/// A poisoned lock is recovered rather than propagated. The map holds plain
/// timestamps, so it is never left half-updated, and refusing to answer would
/// block genuine safety alerts.
///
/// # Example
///
/// ```rust
/// use sitewatch::{NotificationTracker, ViolationCategory};
/// use std::time::Duration;
///
/// let tracker = NotificationTracker::new(Duration::from_secs(10));
///
/// assert!(tracker.should_send(ViolationCategory::Ppe, "John Doe", "Site A"));
/// assert!(!tracker.should_send(ViolationCategory::Ppe, "john doe", "SITE A"));
/// ```
#[derive(Debug)]
pub struct NotificationTracker {
    /// Per-key state, times in clock milliseconds.
    entries: Mutex<HashMap<EventKey, Entry>>,
    /// Window used by `should_send` / `check`.
    default_window: Duration,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl NotificationTracker {
    /// Creates a tracker on a monotonic clock.
    #[must_use]
    pub fn new(default_window: Duration) -> Self {
        Self::with_clock(default_window, Arc::new(MonotonicClock::new()))
    }

    /// Creates a tracker reading time from `clock`.
    #[must_use]
    pub fn with_clock(default_window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_window,
            clock,
        }
    }

    /// Returns true if an alert for this triple may be sent now.
    ///
    /// Uses the tracker's default window.
    pub fn should_send(
        &self,
        category: ViolationCategory,
        subject_name: &str,
        location: &str,
    ) -> bool {
        self.check(category, subject_name, location).is_allowed()
    }

    /// Returns true if an alert for this triple may be sent now, using `window`.
    ///
    /// A zero window always allows.
    pub fn should_send_within(
        &self,
        category: ViolationCategory,
        subject_name: &str,
        location: &str,
        window: Duration,
    ) -> bool {
        self.check_within(category, subject_name, location, window)
            .is_allowed()
    }

    /// Checks the triple against the default window.
    pub fn check(
        &self,
        category: ViolationCategory,
        subject_name: &str,
        location: &str,
    ) -> NotificationDecision {
        self.check_within(category, subject_name, location, self.default_window)
    }

    /// Checks the triple against `window`, recording it if allowed.
    #[instrument(
        skip_all,
        fields(
            operation = "notification_check",
            category = %category,
            window_ms = duration_to_millis(window)
        )
    )]
    pub fn check_within(
        &self,
        category: ViolationCategory,
        subject_name: &str,
        location: &str,
        window: Duration,
    ) -> NotificationDecision {
        let key = EventKey::new(category, subject_name, location);
        let decision = self.decide(&key, window);

        match decision {
            NotificationDecision::Allowed => {
                tracing::debug!(key = %key, "Notification allowed");
            },
            NotificationDecision::Suppressed { retry_after } => {
                tracing::debug!(
                    key = %key,
                    retry_after_ms = duration_to_millis(retry_after),
                    "Duplicate notification suppressed"
                );
            },
        }

        metrics::counter!(
            "notification_dedup_decisions_total",
            "category" => category.as_str(),
            "result" => decision.as_str()
        )
        .increment(1);

        decision
    }

    /// Read-compare-write under the lock.
    fn decide(&self, key: &EventKey, window: Duration) -> NotificationDecision {
        let window_ms = duration_to_millis(window);
        let mut entries = self.lock_entries();
        let now = self.clock.now_millis();

        if let Some(entry) = entries.get_mut(key) {
            let elapsed = now.saturating_sub(entry.last_allowed);
            if elapsed < window_ms {
                entry.window_ms = entry.window_ms.max(window_ms);
                return NotificationDecision::Suppressed {
                    retry_after: Duration::from_millis(window_ms - elapsed),
                };
            }
            *entry = Entry {
                last_allowed: now,
                window_ms,
            };
        } else {
            entries.insert(
                key.clone(),
                Entry {
                    last_allowed: now,
                    window_ms,
                },
            );
            metrics::gauge!("notification_dedup_entries").set(usize_to_f64(entries.len()));
        }

        NotificationDecision::Allowed
    }

    /// Clears all entries.
    pub fn reset(&self) {
        let cleared = {
            let mut entries = self.lock_entries();
            let cleared = entries.len();
            entries.clear();
            cleared
        };

        tracing::debug!(cleared = cleared, "Cleared notification tracker");
        metrics::gauge!("notification_dedup_entries").set(0.0);
    }

    /// Evicts entries whose last allowed time is older than `retention`.
    ///
    /// Entries exactly `retention` old are kept, and so is any entry still
    /// inside a longer per-call window it was checked with.
    #[instrument(
        skip_all,
        fields(operation = "notification_sweep", retention_ms = duration_to_millis(retention))
    )]
    pub fn sweep(&self, retention: Duration) -> SweepReport {
        let retention_ms = duration_to_millis(retention);

        let (removed, remaining, duration_ms) = {
            let mut entries = self.lock_entries();
            let start = Instant::now();
            let now = self.clock.now_millis();
            let before = entries.len();
            entries.retain(|_, entry| {
                let age = now.saturating_sub(entry.last_allowed);
                age <= retention_ms || age < entry.window_ms
            });
            let remaining = entries.len();
            (before - remaining, remaining, duration_to_millis(start.elapsed()))
        };

        if removed > 0 {
            tracing::info!(
                removed = removed,
                remaining = remaining,
                duration_ms = duration_ms,
                "Evicted idle notification entries"
            );
        } else {
            tracing::debug!(remaining = remaining, "Sweep found nothing to evict");
        }

        metrics::counter!("notification_dedup_evictions_total")
            .increment(u64::try_from(removed).unwrap_or(u64::MAX));
        metrics::gauge!("notification_dedup_entries").set(usize_to_f64(remaining));

        SweepReport {
            removed,
            remaining,
            duration_ms,
        }
    }

    /// Returns true if `key` currently has an entry.
    #[must_use]
    pub fn contains(&self, key: &EventKey) -> bool {
        self.lock_entries().contains_key(key)
    }

    /// Returns the number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Returns true if no keys are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the window used when none is given.
    #[must_use]
    pub const fn default_window(&self) -> Duration {
        self.default_window
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<EventKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl NotificationGate for NotificationTracker {
    fn should_send_event(&self, event: &ViolationEvent) -> bool {
        let window = event
            .window_secs
            .map_or(self.default_window, Duration::from_secs);
        self.should_send_within(event.category, &event.subject_name, &event.location, window)
    }

    fn reset(&self) {
        Self::reset(self);
    }
}
