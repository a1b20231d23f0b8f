//! Deduplication service.
//!
//! Owns the notification tracker and its sweep task. Construct one per
//! process and hand clones of the tracker (or the service itself, behind an
//! `Arc`) to the handlers that dispatch alerts.

use crate::Result;
use crate::models::{ViolationCategory, ViolationEvent};
use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, MonotonicClock};
use super::config::DeduplicationConfig;
use super::sweeper::SweepTask;
use super::tracker::NotificationTracker;
use super::types::{NotificationDecision, NotificationGate, SweepReport};

/// Service for notification deduplication.
///
/// # Example
///
/// ```rust,ignore
/// use sitewatch::{DeduplicationConfig, DeduplicationService, ViolationCategory};
///
/// let service = DeduplicationService::start(DeduplicationConfig::from_env())?;
///
/// if service.should_send(ViolationCategory::Ppe, "John Doe", "Site A") {
///     // hand the alert to delivery
/// }
///
/// service.shutdown().await;
/// ```
#[derive(Debug)]
pub struct DeduplicationService {
    /// Configuration.
    config: DeduplicationConfig,
    /// Shared tracker.
    tracker: Arc<NotificationTracker>,
    /// Background sweep, absent when built without one or when disabled.
    sweeper: Option<SweepTask>,
}

impl DeduplicationService {
    /// Validates `config`, builds the tracker, and starts the sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or if no tokio
    /// runtime is available to run the sweep.
    pub fn start(config: DeduplicationConfig) -> Result<Self> {
        Self::start_with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Same as [`start`](Self::start) with an injected clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or if no tokio
    /// runtime is available to run the sweep.
    pub fn start_with_clock(config: DeduplicationConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let tracker = Arc::new(NotificationTracker::with_clock(
            config.default_window,
            clock,
        ));

        let sweeper = if config.enabled {
            Some(SweepTask::spawn(
                Arc::clone(&tracker),
                config.sweep_interval,
                config.retention,
            )?)
        } else {
            None
        };

        tracing::info!(
            enabled = config.enabled,
            window_secs = config.default_window.as_secs(),
            retention_secs = config.retention.as_secs(),
            sweep_interval_secs = config.sweep_interval.as_secs(),
            "Notification deduplication started"
        );

        Ok(Self {
            config,
            tracker,
            sweeper,
        })
    }

    /// Builds the service without a background sweep.
    ///
    /// Needs no runtime. Suited to short-lived processes such as offline
    /// replay, where the process ends long before memory matters; call
    /// [`sweep_now`](Self::sweep_now) to evict manually.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn without_sweeper(config: DeduplicationConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let tracker = Arc::new(NotificationTracker::with_clock(
            config.default_window,
            clock,
        ));

        Ok(Self {
            config,
            tracker,
            sweeper: None,
        })
    }

    /// Returns true if an alert for this triple may be sent now.
    ///
    /// Always true when deduplication is disabled.
    pub fn should_send(
        &self,
        category: ViolationCategory,
        subject_name: &str,
        location: &str,
    ) -> bool {
        self.check(category, subject_name, location).is_allowed()
    }

    /// Returns true if an alert for this triple may be sent now, using `window`.
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

    /// Checks the triple against the configured window.
    pub fn check(
        &self,
        category: ViolationCategory,
        subject_name: &str,
        location: &str,
    ) -> NotificationDecision {
        self.check_within(category, subject_name, location, self.config.default_window)
    }

    /// Checks the triple against `window`.
    pub fn check_within(
        &self,
        category: ViolationCategory,
        subject_name: &str,
        location: &str,
        window: Duration,
    ) -> NotificationDecision {
        if !self.config.enabled {
            tracing::debug!("Deduplication disabled, allowing notification");
            return NotificationDecision::Allowed;
        }

        self.tracker
            .check_within(category, subject_name, location, window)
    }

    /// Clears all tracked keys.
    pub fn reset(&self) {
        self.tracker.reset();
    }

    /// Runs one sweep immediately with the configured retention.
    pub fn sweep_now(&self) -> SweepReport {
        self.tracker.sweep(self.config.retention)
    }

    /// Returns the shared tracker.
    #[must_use]
    pub const fn tracker(&self) -> &Arc<NotificationTracker> {
        &self.tracker
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    /// Returns true if deduplication is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Returns true while the background sweep is running.
    #[must_use]
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(SweepTask::is_running)
    }

    /// Stops the background sweep and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }

        tracing::info!(
            entries = self.tracker.len(),
            "Notification deduplication stopped"
        );
    }
}

impl NotificationGate for DeduplicationService {
    fn should_send_event(&self, event: &ViolationEvent) -> bool {
        let window = event
            .window_secs
            .map_or(self.config.default_window, Duration::from_secs);
        self.should_send_within(event.category, &event.subject_name, &event.location, window)
    }

    fn reset(&self) {
        Self::reset(self);
    }
}
