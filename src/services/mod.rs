//! Business logic services.
//!
//! Deduplication decides whether a violation alert may go out; the alert
//! dispatcher puts that decision in front of a delivery collaborator; replay
//! runs recorded event logs through a tracker offline.

pub mod alerts;
pub mod deduplication;
pub mod replay;

pub use alerts::{AlertDispatcher, AlertSink, DispatchOutcome, TracingSink};
pub use deduplication::{DeduplicationConfig, DeduplicationService, NotificationTracker};
pub use replay::{ReplayDecision, ReplaySession, ReplaySummary, replay_lines};
