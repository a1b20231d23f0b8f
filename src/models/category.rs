//! Violation categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a detected site violation.
///
/// This is a closed set: new categories are added here, never invented at
/// call sites. The category is part of the deduplication key, so a `Zone`
/// alert never suppresses an `Unauthorized` alert for the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationCategory {
    /// Missing personal protective equipment (helmet, vest, goggles).
    Ppe,
    /// Presence inside a restricted zone.
    Zone,
    /// Unrecognized or unauthorized person on site.
    Unauthorized,
}

impl ViolationCategory {
    /// Returns all category variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Ppe, Self::Zone, Self::Unauthorized]
    }

    /// Returns the category as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ppe => "ppe",
            Self::Zone => "zone",
            Self::Unauthorized => "unauthorized",
        }
    }

    /// Parses a category from a string, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ppe" => Some(Self::Ppe),
            "zone" => Some(Self::Zone),
            "unauthorized" | "unauthorised" => Some(Self::Unauthorized),
            _ => None,
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown violation category: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ppe", ViolationCategory::Ppe; "lowercase ppe")]
    #[test_case("PPE", ViolationCategory::Ppe; "uppercase ppe")]
    #[test_case(" Zone ", ViolationCategory::Zone; "padded zone")]
    #[test_case("unauthorized", ViolationCategory::Unauthorized; "us spelling")]
    #[test_case("Unauthorised", ViolationCategory::Unauthorized; "uk spelling")]
    fn test_parse_known(input: &str, expected: ViolationCategory) {
        assert_eq!(ViolationCategory::parse(input), Some(expected));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(ViolationCategory::parse("fire"), None);
        assert_eq!(ViolationCategory::parse(""), None);
        assert!("fire".parse::<ViolationCategory>().is_err());
    }

    #[test]
    fn test_as_str_roundtrips() {
        for category in ViolationCategory::all() {
            assert_eq!(ViolationCategory::parse(category.as_str()), Some(*category));
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ViolationCategory::Unauthorized).unwrap();
        assert_eq!(json, "\"unauthorized\"");

        let parsed: ViolationCategory = serde_json::from_str("\"ppe\"").unwrap();
        assert_eq!(parsed, ViolationCategory::Ppe);
    }
}
