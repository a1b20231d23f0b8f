//! # Sitewatch
//!
//! Notification deduplication for site-monitoring violation alerts.
//!
//! A video pipeline may report the same violation ("worker without PPE at
//! Gate 1") many times per second. Sitewatch decides which of those reports
//! are allowed through to the notification collaborators and which are
//! duplicates of an alert sent moments ago.
//!
//! ## Features
//!
//! - Per-key minimum spacing between alerts (default 10 seconds)
//! - Case-insensitive keys over `(category, subject, location)`
//! - Supervised background sweep bounding memory (default 30 minute retention)
//! - Offline replay of JSON-lines event logs via the `sitewatch` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use sitewatch::{DeduplicationConfig, DeduplicationService, ViolationCategory};
//!
//! let service = DeduplicationService::start(DeduplicationConfig::default())?;
//! if service.should_send(ViolationCategory::Ppe, "John Doe", "Site A") {
//!     // forward to Telegram / SMS / email
//! }
//! service.shutdown().await;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod models;
pub mod observability;
pub mod services;

pub use config::SitewatchConfig;
pub use models::{ViolationCategory, ViolationEvent};
pub use services::alerts::{AlertDispatcher, AlertSink, DispatchOutcome, TracingSink};
pub use services::deduplication::{
    Clock, DeduplicationConfig, DeduplicationService, EventKey, ManualClock, MonotonicClock,
    NotificationDecision, NotificationGate, NotificationTracker, SweepReport, SweepTask,
};

/// Error type for sitewatch operations.
///
/// The deduplication core itself never fails; these variants cover the
/// surrounding configuration, parsing, and delivery surface.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown violation category, malformed event JSON, invalid config values |
/// | `OperationFailed` | Config file I/O or parse errors, logging init, sink delivery failures |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for sitewatch operations.
pub type Result<T> = std::result::Result<T, Error>;
