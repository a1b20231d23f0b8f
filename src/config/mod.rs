//! Configuration management.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `sitewatch.toml` (explicit path, or the platform config dir)
//! 3. `SITEWATCH_*` environment variables
//!
//! ```toml
//! [dedup]
//! enabled = true
//! window_secs = 10
//! retention_secs = 1800
//! sweep_interval_secs = 300
//!
//! [logging]
//! format = "pretty"
//! filter = "info"
//! ```

use crate::services::deduplication::DeduplicationConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "sitewatch.toml";

/// Main configuration for sitewatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitewatchConfig {
    /// Deduplication settings.
    pub dedup: DeduplicationConfig,
    /// Logging settings as read from the file; env overrides are applied
    /// when logging is initialized.
    pub logging: LoggingSettings,
    /// Files that contributed to this configuration.
    pub config_sources: Vec<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    /// Deduplication section.
    pub dedup: Option<ConfigFileDedup>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// `[dedup]` section in the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigFileDedup {
    /// Enable deduplication.
    pub enabled: Option<bool>,
    /// Default suppression window in seconds.
    pub window_secs: Option<u64>,
    /// Idle age before eviction in seconds.
    pub retention_secs: Option<u64>,
    /// Sweep period in seconds.
    pub sweep_interval_secs: Option<u64>,
}

/// `[logging]` section in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `EnvFilter` directives, e.g. `info,sitewatch=debug`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Optional log file; stderr when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl SitewatchConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting deduplication settings are invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let mut config = Self::from_config_file(file);
        config.config_sources.push(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/sitewatch/` on macOS)
    /// 2. XDG config dir (`~/.config/sitewatch/` for Unix compatibility)
    ///
    /// Returns default configuration if no usable config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        for path in default_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                },
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `SitewatchConfig`.
    #[must_use]
    pub fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(dedup) = file.dedup {
            if let Some(enabled) = dedup.enabled {
                config.dedup.enabled = enabled;
            }
            if let Some(secs) = dedup.window_secs {
                config.dedup.default_window = Duration::from_secs(secs);
            }
            if let Some(secs) = dedup.retention_secs {
                config.dedup.retention = Duration::from_secs(secs);
            }
            if let Some(secs) = dedup.sweep_interval_secs {
                config.dedup.sweep_interval = Duration::from_secs(secs);
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Applies `SITEWATCH_DEDUP_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.dedup = self.dedup.with_env_overrides();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the deduplication settings are
    /// out of range.
    pub fn validate(&self) -> Result<()> {
        self.dedup.validate()
    }

    /// Renders the configuration back into file form.
    #[must_use]
    pub fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            dedup: Some(ConfigFileDedup {
                enabled: Some(self.dedup.enabled),
                window_secs: Some(self.dedup.default_window.as_secs()),
                retention_secs: Some(self.dedup.retention.as_secs()),
                sweep_interval_secs: Some(self.dedup.sweep_interval.as_secs()),
            }),
            logging: Some(self.logging.clone()),
        }
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.to_config_file()).map_err(|e| Error::OperationFailed {
            operation: "serialize_config".to_string(),
            cause: e.to_string(),
        })
    }
}

/// Candidate config file locations, in lookup order.
#[must_use]
pub fn default_paths() -> Vec<PathBuf> {
    let Some(base_dirs) = directories::BaseDirs::new() else {
        return Vec::new();
    };

    let platform = base_dirs
        .config_dir()
        .join("sitewatch")
        .join(CONFIG_FILE_NAME);
    let xdg = base_dirs
        .home_dir()
        .join(".config")
        .join("sitewatch")
        .join(CONFIG_FILE_NAME);

    if platform == xdg {
        vec![platform]
    } else {
        vec![platform, xdg]
    }
}
