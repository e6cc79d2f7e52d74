//! Color policy loaded from an external declarative file
//!
//! The file is a list of `{ level, color }` records. YAML is the native
//! format; a path ending in `.toml` is read as a `[[colors]]` array instead.
//! Any failure to read or parse the file disables colors rather than
//! aborting startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::level::LogLevel;

/// Terminal colors a level can be painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermColor {
    White,
    Cyan,
    Blue,
    Green,
    Yellow,
    Red,
    Magenta,
}

impl TermColor {
    /// Parse a color name, case-insensitively
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "WHITE" => Some(TermColor::White),
            "CYAN" => Some(TermColor::Cyan),
            "BLUE" => Some(TermColor::Blue),
            "GREEN" => Some(TermColor::Green),
            "YELLOW" => Some(TermColor::Yellow),
            "RED" => Some(TermColor::Red),
            "MAGENTA" => Some(TermColor::Magenta),
            _ => None,
        }
    }

    /// Foreground color used when rendering
    pub fn to_crossterm(self) -> crossterm::style::Color {
        use crossterm::style::Color;

        match self {
            TermColor::White => Color::White,
            TermColor::Cyan => Color::Cyan,
            TermColor::Blue => Color::Blue,
            TermColor::Green => Color::Green,
            TermColor::Yellow => Color::Yellow,
            TermColor::Red => Color::Red,
            TermColor::Magenta => Color::Magenta,
        }
    }
}

/// One `{ level, color }` entry of the color config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorRecord {
    #[serde(alias = "Level")]
    pub level: String,
    #[serde(alias = "Color")]
    pub color: String,
}

impl ColorRecord {
    pub fn new(level: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlColorFile {
    #[serde(default, alias = "Colors")]
    colors: Vec<ColorRecord>,
}

/// Errors raised while loading a color config file
#[derive(Debug, Error)]
pub enum ColorConfigError {
    #[error("unable to read color config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse color config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unable to parse color config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Immutable level → color mapping
///
/// A level mapped to `None` had an unrecognized color name and is never
/// painted. Levels with no entry are not painted either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssociation {
    enabled: bool,
    colors: HashMap<LogLevel, Option<TermColor>>,
}

impl ColorAssociation {
    /// An association with coloring turned off
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build an enabled association from parsed records
    ///
    /// Records naming an unknown level are skipped. Later records override
    /// earlier ones for the same level.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ColorRecord>,
    {
        let mut colors = HashMap::new();
        for record in records {
            let Some(level) = LogLevel::parse_name(&record.level) else {
                tracing::debug!(level = %record.level, "Ignoring color for unknown level");
                continue;
            };
            colors.insert(level, TermColor::parse_name(&record.color));
        }

        Self {
            enabled: true,
            colors,
        }
    }

    /// Parse YAML content: a list of `{ level, color }` records
    pub fn parse_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let records: Vec<ColorRecord> = serde_yaml::from_str(content)?;
        Ok(Self::from_records(records))
    }

    /// Parse TOML content: a `[[colors]]` array of `{ level, color }` tables
    pub fn parse_toml(content: &str) -> Result<Self, toml::de::Error> {
        let file: TomlColorFile = toml::from_str(content)?;
        Ok(Self::from_records(file.colors))
    }

    /// Load and parse a color config file
    pub fn load(path: &Path) -> Result<Self, ColorConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ColorConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::parse_toml(&content).map_err(|source| ColorConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            Self::parse_yaml(&content).map_err(|source| ColorConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Load from an optional path, disabling colors on any failure
    pub fn from_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::disabled();
        };

        match Self::load(path) {
            Ok(colors) => colors,
            Err(e) => {
                tracing::warn!("Colors disabled: {}", e);
                Self::disabled()
            }
        }
    }

    /// Whether colors are applied at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Color for a level, if one is configured and valid
    pub fn color_for(&self, level: LogLevel) -> Option<TermColor> {
        if !self.enabled {
            return None;
        }
        self.colors.get(&level).copied().flatten()
    }
}
