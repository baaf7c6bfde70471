use ratatui::style::Color;
use ratatui::widgets::BorderType;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{config_dir, ConfigError};

pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() { return Color::Reset; }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(0);
    Color::Rgb(r, g, b)
}

fn default_border_style() -> String { "rounded".to_owned() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    // Backgrounds
    pub bg_primary: String, pub bg_secondary: String,
    // Borders
    pub border_normal: String,
    // Text
    pub text_primary: String, pub text_muted: String, pub text_accent: String,
    // Highlights
    pub today_bg: String, pub today_fg: String,
    pub selected_bg: String, pub selected_fg: String,
    pub weekend_fg: String,
    /// Border style: "rounded" | "double" | "thick" | "plain"
    #[serde(default = "default_border_style")]
    pub border_style: String,
}

impl ThemeConfig {
    // ── Color accessors ───────────────────────────────────────────────────────
    pub fn bg(&self)            -> Color { hex_to_color(&self.bg_primary) }
    pub fn bg2(&self)           -> Color { hex_to_color(&self.bg_secondary) }
    pub fn border(&self)        -> Color { hex_to_color(&self.border_normal) }
    pub fn fg(&self)            -> Color { hex_to_color(&self.text_primary) }
    pub fn fg_dim(&self)        -> Color { hex_to_color(&self.text_muted) }
    pub fn accent(&self)        -> Color { hex_to_color(&self.text_accent) }
    pub fn weekend_color(&self) -> Color { hex_to_color(&self.weekend_fg) }

    pub fn today_highlight(&self)    -> (Color, Color) {
        (hex_to_color(&self.today_bg), hex_to_color(&self.today_fg))
    }
    pub fn selected_highlight(&self) -> (Color, Color) {
        (hex_to_color(&self.selected_bg), hex_to_color(&self.selected_fg))
    }

    pub fn border_type(&self) -> BorderType {
        match self.border_style.as_str() {
            "double" => BorderType::Double,
            "thick"  => BorderType::Thick,
            "plain"  => BorderType::Plain,
            _        => BorderType::Rounded,
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// A saved `theme.toml` wins; otherwise the named built-in, or the default.
    pub fn load(preferred: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_dir().join("theme.toml");
        if path.exists() {
            return Self::load_from(&path);
        }
        match preferred {
            Some(name) => Self::by_name(name).ok_or_else(|| ConfigError::UnknownTheme(name.to_owned())),
            None       => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let dir = config_dir();
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        tracing::info!("saved theme {}", self.name);
        Ok(())
    }

    // ── Theme catalogue ───────────────────────────────────────────────────────
    pub fn all_themes() -> Vec<ThemeConfig> {
        vec![
            ThemeConfig::default(),    // Catppuccin Mocha
            ThemeConfig::nord(),
            ThemeConfig::gruvbox(),
            ThemeConfig::tokyo_night(),
            ThemeConfig::paper(),
        ]
    }

    pub fn by_name(name: &str) -> Option<ThemeConfig> {
        Self::all_themes().into_iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    // ── Built-in themes ───────────────────────────────────────────────────────

    pub fn nord() -> Self { Self {
        name: "nord".into(),
        bg_primary: "#2e3440".into(), bg_secondary: "#3b4252".into(),
        border_normal: "#4c566a".into(),
        text_primary: "#eceff4".into(), text_muted: "#4c566a".into(), text_accent: "#88c0d0".into(),
        today_bg: "#88c0d0".into(), today_fg: "#2e3440".into(),
        selected_bg: "#81a1c1".into(), selected_fg: "#2e3440".into(),
        weekend_fg: "#bf616a".into(),
        border_style: "rounded".into(),
    }}

    pub fn gruvbox() -> Self { Self {
        name: "gruvbox".into(),
        bg_primary: "#282828".into(), bg_secondary: "#1d2021".into(),
        border_normal: "#504945".into(),
        text_primary: "#ebdbb2".into(), text_muted: "#7c6f64".into(), text_accent: "#d79921".into(),
        today_bg: "#d79921".into(), today_fg: "#282828".into(),
        selected_bg: "#689d6a".into(), selected_fg: "#282828".into(),
        weekend_fg: "#fb4934".into(),
        border_style: "rounded".into(),
    }}

    pub fn tokyo_night() -> Self { Self {
        name: "tokyo-night".into(),
        bg_primary: "#1a1b26".into(), bg_secondary: "#16161e".into(),
        border_normal: "#3d4166".into(),
        text_primary: "#c0caf5".into(), text_muted: "#565f89".into(), text_accent: "#7aa2f7".into(),
        today_bg: "#bb9af7".into(), today_fg: "#1a1b26".into(),
        selected_bg: "#7aa2f7".into(), selected_fg: "#1a1b26".into(),
        weekend_fg: "#f7768e".into(),
        border_style: "rounded".into(),
    }}

    /// Light palette close to a plain web page: blue selection, green today.
    pub fn paper() -> Self { Self {
        name: "paper".into(),
        bg_primary: "#ffffff".into(), bg_secondary: "#f5f5f5".into(),
        border_normal: "#e0e0e0".into(),
        text_primary: "#333333".into(), text_muted: "#bbbbbb".into(), text_accent: "#333333".into(),
        today_bg: "#f0f8f0".into(), today_fg: "#28a745".into(),
        selected_bg: "#007bff".into(), selected_fg: "#ffffff".into(),
        weekend_fg: "#666666".into(),
        border_style: "plain".into(),
    }}
}

impl Default for ThemeConfig {
    fn default() -> Self { Self {
        name: "catppuccin-mocha".into(),
        bg_primary: "#1e1e2e".into(), bg_secondary: "#181825".into(),
        border_normal: "#45475a".into(),
        text_primary: "#cdd6f4".into(), text_muted: "#6c7086".into(), text_accent: "#89b4fa".into(),
        today_bg: "#cba6f7".into(), today_fg: "#1e1e2e".into(),
        selected_bg: "#89b4fa".into(), selected_fg: "#1e1e2e".into(),
        weekend_fg: "#f38ba8".into(),
        border_style: "rounded".into(),
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#89b4fa"), Color::Rgb(0x89, 0xb4, 0xfa));
        assert_eq!(hex_to_color("007bff"), Color::Rgb(0, 0x7b, 0xff));
        assert_eq!(hex_to_color("#fff"), Color::Reset);
    }

    #[test]
    fn test_by_name_is_case_insensitive() {
        assert_eq!(ThemeConfig::by_name("Nord").map(|t| t.name), Some("nord".to_owned()));
        assert!(ThemeConfig::by_name("solarized").is_none());
    }

    #[test]
    fn test_theme_names_are_unique() {
        let themes = ThemeConfig::all_themes();
        for (i, a) in themes.iter().enumerate() {
            assert!(themes[i + 1..].iter().all(|b| b.name != a.name), "duplicate {}", a.name);
        }
    }

    #[test]
    fn test_toml_roundtrip_without_border_style() {
        let mut text = toml::to_string(&ThemeConfig::gruvbox()).unwrap();
        text = text.lines().filter(|l| !l.starts_with("border_style")).collect::<Vec<_>>().join("\n");
        let theme: ThemeConfig = toml::from_str(&text).unwrap();
        assert_eq!(theme.border_style, "rounded");
        assert_eq!(theme.border_type(), BorderType::Rounded);
        assert_eq!(theme.name, "gruvbox");
    }
}
