//! Notification deduplication.
//!
//! Suppresses repeated violation alerts for the same
//! `(category, subject, location)` that arrive within a short window of the
//! last alert actually sent.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  DeduplicationService                       │
//! │  ┌──────────────────────────┐   ┌────────────────────────┐  │
//! │  │ NotificationTracker      │◄──│ SweepTask              │  │
//! │  │                          │   │                        │  │
//! │  │ EventKey -> last allowed │   │ every 5 min: evict     │  │
//! │  │ (10 s window)            │   │ entries idle > 30 min  │  │
//! │  └──────────────────────────┘   └────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sitewatch::services::deduplication::{DeduplicationConfig, DeduplicationService};
//! use sitewatch::ViolationCategory;
//!
//! let service = DeduplicationService::start(DeduplicationConfig::default())?;
//!
//! assert!(service.should_send(ViolationCategory::Ppe, "John Doe", "Site A"));
//! assert!(!service.should_send(ViolationCategory::Ppe, "JOHN DOE", "site a"));
//! ```

mod clock;
mod config;
mod key;
mod service;
mod sweeper;
mod tracker;
mod types;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL, DEFAULT_WINDOW, DeduplicationConfig};
pub use key::EventKey;
pub use service::DeduplicationService;
pub use sweeper::SweepTask;
pub use tracker::NotificationTracker;
pub use types::{NotificationDecision, NotificationGate, SweepReport};
