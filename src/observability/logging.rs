//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";
const VERBOSE_FILTER: &str = "debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, falling back to pretty for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
///
/// # Environment Variables
///
/// | Variable | Overrides |
/// |----------|-----------|
/// | `SITEWATCH_LOG_FORMAT` | `format` |
/// | `SITEWATCH_LOG_FILE` | `file` |
/// | `RUST_LOG` | `filter` (also beats `--verbose`) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub filter: String,
    /// Log file; stderr when absent.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from environment variables.
    #[must_use]
    pub fn from_env(verbose: bool) -> Self {
        Self::from_settings(None, verbose)
    }

    /// Builds logging configuration from config settings with env overrides.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_settings_with(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Same as [`from_settings`](Self::from_settings) with an explicit
    /// variable lookup.
    #[must_use]
    pub fn from_settings_with(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut format = settings
            .and_then(|s| s.format.as_deref())
            .map_or_else(LogFormat::default, LogFormat::parse);
        let mut filter = if verbose {
            VERBOSE_FILTER.to_string()
        } else {
            settings
                .and_then(|s| s.filter.clone())
                .unwrap_or_else(|| DEFAULT_FILTER.to_string())
        };
        let mut file = settings.and_then(|s| s.file.clone());

        if let Some(v) = lookup("SITEWATCH_LOG_FORMAT") {
            format = LogFormat::parse(&v);
        }
        if let Some(v) = lookup("SITEWATCH_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            file = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            filter = v;
        }

        Self {
            format,
            filter,
            file,
        }
    }

    /// Builds the subscriber filter, falling back to `info` on bad directives.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test_case("json", LogFormat::Json; "json")]
    #[test_case(" JSON ", LogFormat::Json; "json mixed case")]
    #[test_case("pretty", LogFormat::Pretty; "pretty")]
    #[test_case("xml", LogFormat::Pretty; "unknown")]
    fn test_log_format_parse(input: &str, expected: LogFormat) {
        assert_eq!(LogFormat::parse(input), expected);
    }

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::from_settings_with(None, false, no_env);
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_settings_then_verbose() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            filter: Some("warn".to_string()),
            file: None,
        };

        let quiet = LoggingConfig::from_settings_with(Some(&settings), false, no_env);
        assert_eq!(quiet.format, LogFormat::Json);
        assert_eq!(quiet.filter, "warn");

        let verbose = LoggingConfig::from_settings_with(Some(&settings), true, no_env);
        assert_eq!(verbose.filter, "debug");
    }

    #[test]
    fn test_env_overrides_win() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            filter: Some("warn".to_string()),
            file: None,
        };
        let lookup = |key: &str| match key {
            "SITEWATCH_LOG_FORMAT" => Some("pretty".to_string()),
            "SITEWATCH_LOG_FILE" => Some("/tmp/sitewatch.log".to_string()),
            "RUST_LOG" => Some("sitewatch=trace".to_string()),
            _ => None,
        };

        let config = LoggingConfig::from_settings_with(Some(&settings), true, lookup);

        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.filter, "sitewatch=trace");
        assert_eq!(config.file, Some(PathBuf::from("/tmp/sitewatch.log")));
    }
}
