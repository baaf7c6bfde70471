use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::WeekStart;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("writing configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
}

fn default_year_span() -> u32 { 20 }
fn default_show_adjacent() -> bool { true }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub week_start: WeekStart,
    /// Render leading/trailing days of neighbouring months.
    #[serde(default = "default_show_adjacent")]
    pub show_adjacent_days: bool,
    /// Years listed either side of the current one in the year picker.
    #[serde(default = "default_year_span")]
    pub year_span: u32,
    pub theme: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            week_start:         WeekStart::Sunday,
            show_adjacent_days: default_show_adjacent(),
            year_span:          default_year_span(),
            theme:              None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_dir().join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::parse(&std::fs::read_to_string(path)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smartcal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let cfg = AppConfig::parse(
            "week_start = \"monday\"\nshow_adjacent_days = false\nyear_span = 5\ntheme = \"nord\"\n",
        )
        .unwrap();
        assert_eq!(cfg.week_start, WeekStart::Monday);
        assert!(!cfg.show_adjacent_days);
        assert_eq!(cfg.year_span, 5);
        assert_eq!(cfg.theme.as_deref(), Some("nord"));
    }

    #[test]
    fn test_bad_week_start_is_a_parse_error() {
        let err = AppConfig::parse("week_start = \"friday\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("smartcal-no-such-dir").join("config.toml");
        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());
    }
}
