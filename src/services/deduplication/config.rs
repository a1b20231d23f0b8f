//! Deduplication configuration.
//!
//! Suppression window, retention threshold, and sweep cadence for the
//! notification tracker.

use crate::{Error, Result};
use std::time::Duration;

/// Default minimum spacing between two alerts sharing a key.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

/// Default idle age after which the sweep evicts an entry.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(30 * 60);

/// Default period between two sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for notification deduplication.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `SITEWATCH_DEDUP_ENABLED` | bool | `true` | Enable deduplication |
/// | `SITEWATCH_DEDUP_WINDOW_SECS` | u64 | `10` | Default suppression window |
/// | `SITEWATCH_DEDUP_RETENTION_SECS` | u64 | `1800` | Idle age before eviction |
/// | `SITEWATCH_DEDUP_SWEEP_INTERVAL_SECS` | u64 | `300` | Sweep period |
///
/// # Example
///
/// ```rust
/// use sitewatch::DeduplicationConfig;
/// use std::time::Duration;
///
/// let config = DeduplicationConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.default_window, Duration::from_secs(10));
/// assert_eq!(config.retention, Duration::from_secs(1800));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeduplicationConfig {
    /// Enable/disable deduplication. When disabled every alert is allowed.
    pub enabled: bool,

    /// Window applied when the caller does not pass one.
    pub default_window: Duration,

    /// Idle age after which the sweep removes an entry.
    ///
    /// Memory bounding only; must stay well above any window in use.
    pub retention: Duration,

    /// Period of the background sweep.
    pub sweep_interval: Duration,
}

impl DeduplicationConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Falls back to defaults for any unset or unparseable variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `SITEWATCH_DEDUP_*` environment overrides on top of `self`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// `lookup` receives the environment variable name and returns its value.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("SITEWATCH_DEDUP_ENABLED") {
            self.enabled = v.to_lowercase() != "false" && v != "0";
        }

        let secs = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(s) = secs("SITEWATCH_DEDUP_WINDOW_SECS") {
            self.default_window = Duration::from_secs(s);
        }
        if let Some(s) = secs("SITEWATCH_DEDUP_RETENTION_SECS") {
            self.retention = Duration::from_secs(s);
        }
        if let Some(s) = secs("SITEWATCH_DEDUP_SWEEP_INTERVAL_SECS") {
            self.sweep_interval = Duration::from_secs(s);
        }

        self
    }

    /// Checks the configuration for values the tracker cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the window or sweep interval is
    /// zero, or if the retention threshold does not exceed the window.
    pub fn validate(&self) -> Result<()> {
        if self.default_window.is_zero() {
            return Err(Error::InvalidInput(
                "dedup window must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(Error::InvalidInput(
                "dedup sweep interval must be greater than zero".to_string(),
            ));
        }
        if self.retention <= self.default_window {
            return Err(Error::InvalidInput(format!(
                "dedup retention ({}s) must exceed the window ({}s)",
                self.retention.as_secs(),
                self.default_window.as_secs()
            )));
        }
        Ok(())
    }

    /// Builder method to set enabled state.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to set the default window.
    #[must_use]
    pub const fn with_default_window(mut self, window: Duration) -> Self {
        self.default_window = window;
        self
    }

    /// Builder method to set the retention threshold.
    #[must_use]
    pub const fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Builder method to set the sweep interval.
    #[must_use]
    pub const fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_window: DEFAULT_WINDOW,
            retention: DEFAULT_RETENTION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DeduplicationConfig::default();

        assert!(config.enabled);
        assert_eq!(config.default_window, Duration::from_secs(10));
        assert_eq!(config.retention, Duration::from_secs(1800));
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_applied() {
        let config = DeduplicationConfig::default().with_overrides_from(lookup_from(&[
            ("SITEWATCH_DEDUP_ENABLED", "false"),
            ("SITEWATCH_DEDUP_WINDOW_SECS", "30"),
            ("SITEWATCH_DEDUP_RETENTION_SECS", "3600"),
            ("SITEWATCH_DEDUP_SWEEP_INTERVAL_SECS", " 60 "),
        ]));

        assert!(!config.enabled);
        assert_eq!(config.default_window, Duration::from_secs(30));
        assert_eq!(config.retention, Duration::from_secs(3600));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_unparseable_overrides_ignored() {
        let config = DeduplicationConfig::default().with_overrides_from(lookup_from(&[
            ("SITEWATCH_DEDUP_WINDOW_SECS", "ten"),
            ("SITEWATCH_DEDUP_RETENTION_SECS", "-5"),
        ]));

        assert_eq!(config, DeduplicationConfig::default());
    }

    #[test]
    fn test_enabled_zero_disables() {
        let config = DeduplicationConfig::default()
            .with_overrides_from(lookup_from(&[("SITEWATCH_DEDUP_ENABLED", "0")]));
        assert!(!config.enabled);
    }

    #[test]
    fn test_builder_methods() {
        let config = DeduplicationConfig::default()
            .with_enabled(false)
            .with_default_window(Duration::from_secs(5))
            .with_retention(Duration::from_secs(600))
            .with_sweep_interval(Duration::from_secs(120));

        assert!(!config.enabled);
        assert_eq!(config.default_window, Duration::from_secs(5));
        assert_eq!(config.retention, Duration::from_secs(600));
        assert_eq!(config.sweep_interval, Duration::from_secs(120));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = DeduplicationConfig::default().with_default_window(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_zero_sweep_interval() {
        let config = DeduplicationConfig::default().with_sweep_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_retention_below_window() {
        let config = DeduplicationConfig::default()
            .with_default_window(Duration::from_secs(60))
            .with_retention(Duration::from_secs(60));
        assert!(config.validate().is_err());
    }
}
