//! Data models for sitewatch.
//!
//! Violation categories and the event record exchanged with the detection
//! pipeline and notification collaborators.

mod category;
mod events;

pub use category::ViolationCategory;
pub use events::ViolationEvent;
