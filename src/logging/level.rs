//! Severity scale for the file logger
//!
//! Levels are ordered by numeric value. `Mandatory` sorts lowest but is never
//! subject to the threshold: it is always written.

use std::fmt;
use std::str::FromStr;

/// Log level of a message, or the threshold of a writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Always written, regardless of the threshold
    Mandatory = 1,
    #[default]
    Error = 2,
    Warn = 4,
    Info = 8,
    Debug = 16,
}

impl LogLevel {
    /// All levels, least verbose first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Mandatory,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Mandatory => "MANDATORY",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Line prefix used by the leveled convenience wrappers
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Mandatory => "",
            LogLevel::Error => "ERROR - ",
            LogLevel::Warn => "WARN - ",
            LogLevel::Info => "INFO - ",
            LogLevel::Debug => "DEBUG - ",
        }
    }

    /// Numeric value on the severity scale
    pub fn value(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.value() == value)
    }

    /// Parse a threshold name, case-insensitively.
    ///
    /// Only ERROR, WARN, INFO and DEBUG are thresholds; `Mandatory` is not a
    /// valid threshold name and yields `None`.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Some(LogLevel::Error),
            "WARN" => Some(LogLevel::Warn),
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Parse a threshold name, falling back to `Error` for anything unknown
    pub fn from_name_or_error(name: &str) -> Self {
        Self::parse_name(name).unwrap_or(LogLevel::Error)
    }

    /// Whether a message at this level passes the given threshold
    pub fn passes(self, threshold: LogLevel) -> bool {
        self == LogLevel::Mandatory || self <= threshold
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s).ok_or_else(|| UnknownLevel(s.to_string()))
    }
}
