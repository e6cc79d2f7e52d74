//! Configuration management for ilog
//!
//! All environment variables are read once, in [`Settings::from_env`], and
//! the result is injected into the writer and the server.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::logging::{
    program_name, ColorAssociation, LogLevel, LoggerConfig, DEFAULT_RETENTION_DAYS,
};

/// Default threshold name, e.g. `INFO`
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
/// Optional path of the color config file
pub const COLOR_CONFIG_ENV: &str = "LOG_COLOR_CONFIG";
/// Data directory; UI logs go to `<data>/uilogs`
pub const DATA_DIR_ENV: &str = "ILOG_DATA_DIR";
/// `true` enables writes from the UI log endpoint
pub const ENABLE_UI_LOGGING_ENV: &str = "ILOG_ENABLE_UI_LOGGING";
/// Port of the UI log endpoint
pub const PORT_ENV: &str = "ILOG_PORT";
/// Days of daily files to keep; unset or 0 keeps every file
pub const RETENTION_DAYS_ENV: &str = "ILOG_RETENTION_DAYS";

/// Default port for the UI log server
pub const DEFAULT_PORT: u16 = 9898;

/// Process settings captured at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Threshold used when the writer is configured without an explicit level
    pub default_level: LogLevel,
    /// Color config file, if any
    pub color_config: Option<PathBuf>,
    /// Base data directory
    pub data_dir: PathBuf,
    /// Whether the UI log endpoint writes anything
    pub ui_logging_enabled: bool,
    /// Port for the UI log server
    pub port: u16,
    /// Retention window for startup cleanup; 0 disables it
    pub retention_days: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Error,
            color_config: None,
            data_dir: default_data_dir(),
            ui_logging_enabled: false,
            port: DEFAULT_PORT,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function
    ///
    /// Level names and the UI logging flag never fail: bad values fall back
    /// to their defaults. Unparseable numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_level = lookup(LOG_LEVEL_ENV)
            .map(|name| LogLevel::from_name_or_error(&name))
            .unwrap_or(defaults.default_level);

        let color_config = non_empty(COLOR_CONFIG_ENV).map(PathBuf::from);

        let data_dir = non_empty(DATA_DIR_ENV)
            .map(|dir| PathBuf::from(dir.trim_end_matches('/')))
            .unwrap_or(defaults.data_dir);

        let ui_logging_enabled = lookup(ENABLE_UI_LOGGING_ENV)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.ui_logging_enabled);

        let port = match non_empty(PORT_ENV) {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", PORT_ENV, port))?,
            None => defaults.port,
        };

        let retention_days = match non_empty(RETENTION_DAYS_ENV) {
            Some(days) => days
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", RETENTION_DAYS_ENV, days))?,
            None => defaults.retention_days,
        };

        Ok(Self {
            default_level,
            color_config,
            data_dir,
            ui_logging_enabled,
            port,
            retention_days,
        })
    }

    /// Directory of the UI log files
    pub fn ui_log_dir(&self) -> PathBuf {
        self.data_dir.join("uilogs")
    }

    /// Build the writer configuration, loading the color policy once
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig::new(self.ui_log_dir())
            .with_default_level(self.default_level)
            .with_colors(ColorAssociation::from_path(self.color_config.as_deref()))
            .with_program_name(program_name())
    }
}

/// Get the default data directory (<local data dir>/ilog)
/// Falls back to ./.ilog if the platform directory cannot be determined
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("ilog"))
        .unwrap_or_else(|| PathBuf::from(".ilog"))
}

/// Ensure the directory tree under `data_dir` exists
pub fn ensure_directories(settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(&settings.data_dir).context("Failed to create data directory")?;

    std::fs::create_dir_all(settings.ui_log_dir())
        .context("Failed to create UI log directory")?;

    Ok(())
}
