//! Violation events reported by the detection pipeline.

use super::ViolationCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single violation report.
///
/// Collaborators build this from whatever the detector emitted; the
/// deduplication core only looks at `category`, `subject_name` and
/// `location`.
///
/// # Example
///
/// ```rust
/// use sitewatch::{ViolationCategory, ViolationEvent};
///
/// let event: ViolationEvent = serde_json::from_str(
///     r#"{"category":"ppe","subject_name":"John Doe","location":"Site A"}"#,
/// ).unwrap();
/// assert_eq!(event.category, ViolationCategory::Ppe);
/// assert!(event.detected_at.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationEvent {
    /// Violation classification.
    pub category: ViolationCategory,
    /// Person or entity involved.
    pub subject_name: String,
    /// Where the violation was observed.
    pub location: String,
    /// When the detector observed the violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<DateTime<Utc>>,
    /// Per-event suppression window override, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_secs: Option<u64>,
}

impl ViolationEvent {
    /// Creates an event with no timestamp or window override.
    #[must_use]
    pub fn new(
        category: ViolationCategory,
        subject_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            category,
            subject_name: subject_name.into(),
            location: location.into(),
            detected_at: None,
            window_secs: None,
        }
    }

    /// Sets the detection timestamp.
    #[must_use]
    pub const fn with_detected_at(mut self, detected_at: DateTime<Utc>) -> Self {
        self.detected_at = Some(detected_at);
        self
    }

    /// Sets the per-event window override.
    #[must_use]
    pub const fn with_window_secs(mut self, window_secs: u64) -> Self {
        self.window_secs = Some(window_secs);
        self
    }
}
