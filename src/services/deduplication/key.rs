//! Event key normalization.
//!
//! Two reports of the same violation must map to the same key even when the
//! detector spells the subject or location with different case or spacing.

use crate::models::ViolationCategory;
use std::fmt;

/// Normalized deduplication key.
///
/// Fields are kept separate rather than joined into one string, so a subject
/// containing the separator can never collide with another location.
///
/// # Normalization
///
/// Subject and location are:
/// - Trimmed of leading/trailing whitespace
/// - Converted to lowercase
/// - Collapsed so internal whitespace runs become single spaces
///
/// # Example
///
/// ```rust
/// use sitewatch::{EventKey, ViolationCategory};
///
/// let a = EventKey::new(ViolationCategory::Ppe, "Alice", "Gate1");
/// let b = EventKey::new(ViolationCategory::Ppe, "  ALICE ", "gate1");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    category: ViolationCategory,
    subject: String,
    location: String,
}

impl EventKey {
    /// Builds the key for a `(category, subject, location)` triple.
    #[must_use]
    pub fn new(category: ViolationCategory, subject_name: &str, location: &str) -> Self {
        Self {
            category,
            subject: Self::normalize(subject_name),
            location: Self::normalize(location),
        }
    }

    /// Normalizes one free-form key field.
    ///
    /// ```rust
    /// use sitewatch::EventKey;
    ///
    /// assert_eq!(EventKey::normalize("  John   DOE "), "john doe");
    /// assert_eq!(EventKey::normalize(""), "");
    /// ```
    #[must_use]
    pub fn normalize(field: &str) -> String {
        field
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the violation category.
    #[must_use]
    pub const fn category(&self) -> ViolationCategory {
        self.category
    }

    /// Returns the normalized subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the normalized location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.category, self.subject, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        let a = EventKey::new(ViolationCategory::Ppe, "Alice", "Gate1");
        let b = EventKey::new(ViolationCategory::Ppe, "ALICE", "gate1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_category_is_part_of_key() {
        let zone = EventKey::new(ViolationCategory::Zone, "Jane", "Site B");
        let unauthorized = EventKey::new(ViolationCategory::Unauthorized, "Jane", "Site B");
        assert_ne!(zone, unauthorized);
    }

    #[test]
    fn test_fields_do_not_bleed() {
        // Joined naively these would both read "a b c".
        let a = EventKey::new(ViolationCategory::Ppe, "a b", "c");
        let b = EventKey::new(ViolationCategory::Ppe, "a", "b c");
        assert_ne!(a, b);
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(EventKey::normalize("  John\t Doe\n"), "john doe");
    }

    #[test]
    fn test_empty_fields_are_valid() {
        let a = EventKey::new(ViolationCategory::Zone, "", "   ");
        let b = EventKey::new(ViolationCategory::Zone, " ", "");
        assert_eq!(a, b);
        assert_eq!(a.subject(), "");
        assert_eq!(a.location(), "");
    }

    #[test]
    fn test_unicode_lowercased() {
        assert_eq!(EventKey::normalize("Площадка"), "площадка");
        assert_eq!(EventKey::normalize("ÖMER"), EventKey::normalize("ömer"));
    }

    #[test]
    fn test_display() {
        let key = EventKey::new(ViolationCategory::Ppe, "John Doe", "Site A");
        assert_eq!(key.to_string(), "ppe:john doe@site a");
    }
}
