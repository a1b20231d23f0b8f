//! Alert dispatch through the deduplication gate.
//!
//! Handlers receive violation events from the detection pipeline, ask the
//! gate whether the alert may go out, and pass allowed alerts to a sink.
//! Formatting and transport (Telegram, SMS, email) live behind [`AlertSink`].
//!
//! # Event Flow
//!
//! ```text
//! ViolationEvent --> NotificationGate --allowed--> AlertSink
//!                          |
//!                          +--duplicate--> dropped (counted)
//! ```

use crate::Result;
use crate::models::ViolationEvent;
use crate::services::deduplication::NotificationGate;
use std::fmt;
use std::sync::Arc;

/// Delivery collaborator for allowed alerts.
pub trait AlertSink: Send + Sync {
    /// Delivers one alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects or fails to send the alert.
    fn deliver(&self, event: &ViolationEvent) -> Result<()>;
}

/// Sink that records alerts as structured log events.
///
/// Stands in for a real transport in development and in the replay tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn deliver(&self, event: &ViolationEvent) -> Result<()> {
        tracing::info!(
            category = %event.category,
            subject = %event.subject_name,
            location = %event.location,
            detected_at = ?event.detected_at,
            "Violation alert"
        );
        Ok(())
    }
}

/// What happened to a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The gate allowed the alert and the sink accepted it.
    Delivered,
    /// The gate judged the alert a duplicate; the sink was not called.
    Suppressed,
}

/// Routes violation events through the gate to a sink.
///
/// # Example
///
/// ```rust
/// use sitewatch::{
///     AlertDispatcher, DispatchOutcome, NotificationTracker, TracingSink, ViolationCategory,
///     ViolationEvent,
/// };
/// use std::sync::Arc;
///
/// let dispatcher = AlertDispatcher::new(
///     Arc::new(NotificationTracker::default()),
///     Arc::new(TracingSink),
/// );
/// let event = ViolationEvent::new(ViolationCategory::Ppe, "John Doe", "Site A");
///
/// assert_eq!(dispatcher.dispatch(&event).unwrap(), DispatchOutcome::Delivered);
/// assert_eq!(dispatcher.dispatch(&event).unwrap(), DispatchOutcome::Suppressed);
/// ```
#[derive(Clone)]
pub struct AlertDispatcher {
    gate: Arc<dyn NotificationGate>,
    sink: Arc<dyn AlertSink>,
}

impl fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("gate", &"<dyn NotificationGate>")
            .field("sink", &"<dyn AlertSink>")
            .finish()
    }
}

impl AlertDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(gate: Arc<dyn NotificationGate>, sink: Arc<dyn AlertSink>) -> Self {
        Self { gate, sink }
    }

    /// Dispatches one event.
    ///
    /// A sink failure is returned to the caller. The gate has already
    /// recorded the alert as sent at that point, so a retry within the window
    /// is suppressed.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if delivery fails.
    pub fn dispatch(&self, event: &ViolationEvent) -> Result<DispatchOutcome> {
        if !self.gate.should_send_event(event) {
            metrics::counter!(
                "alert_dispatch_total",
                "category" => event.category.as_str(),
                "outcome" => "suppressed"
            )
            .increment(1);
            return Ok(DispatchOutcome::Suppressed);
        }

        match self.sink.deliver(event) {
            Ok(()) => {
                metrics::counter!(
                    "alert_dispatch_total",
                    "category" => event.category.as_str(),
                    "outcome" => "delivered"
                )
                .increment(1);
                Ok(DispatchOutcome::Delivered)
            },
            Err(e) => {
                metrics::counter!(
                    "alert_dispatch_total",
                    "category" => event.category.as_str(),
                    "outcome" => "failed"
                )
                .increment(1);
                tracing::error!(
                    category = %event.category,
                    subject = %event.subject_name,
                    location = %event.location,
                    error = %e,
                    "Alert delivery failed"
                );
                Err(e)
            },
        }
    }
}
