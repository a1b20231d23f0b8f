//! Deduplication result types.
//!
//! This module defines the decisions returned by the tracker and the gate
//! trait handlers depend on.

use crate::models::ViolationEvent;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Outcome of a single deduplication check.
///
/// # Example
///
/// ```rust
/// use sitewatch::NotificationDecision;
/// use std::time::Duration;
///
/// let decision = NotificationDecision::Suppressed {
///     retry_after: Duration::from_secs(4),
/// };
/// assert!(!decision.is_allowed());
/// assert_eq!(decision.retry_after(), Some(Duration::from_secs(4)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationDecision {
    /// The alert may be sent; the key's timestamp was refreshed.
    Allowed,

    /// The alert duplicates one sent within the window.
    Suppressed {
        /// Time until the key is released again.
        retry_after: Duration,
    },
}

impl NotificationDecision {
    /// Returns true if the alert may be sent.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the remaining suppression time, if suppressed.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Allowed => None,
            Self::Suppressed { retry_after } => Some(*retry_after),
        }
    }

    /// Returns the decision as a metrics label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Suppressed { .. } => "suppressed",
        }
    }
}

impl fmt::Display for NotificationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SweepReport {
    /// Entries evicted because they were idle past the retention threshold.
    pub removed: usize,
    /// Entries left in the tracker.
    pub remaining: usize,
    /// Time spent scanning entries while holding the lock, in milliseconds.
    ///
    /// Excludes time spent waiting to acquire it.
    pub duration_ms: u64,
}

/// Gate consulted before an alert is handed to delivery.
///
/// Allows handlers to depend on the decision without knowing how it is made
/// (e.g. a fixed-answer gate in tests).
pub trait NotificationGate: Send + Sync {
    /// Returns true if `event` should be forwarded now.
    ///
    /// Uses the event's own window override when present.
    fn should_send_event(&self, event: &ViolationEvent) -> bool;

    /// Forgets every key seen so far.
    fn reset(&self);
}
