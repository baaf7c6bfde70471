//! Process-wide calendar styles, registered at most once.
//!
//! The first calendar to mount resolves the theme into ratatui styles and
//! installs them; later calls are no-ops and there is no teardown. Without a
//! styled output context (not a terminal, or `NO_COLOR` set) nothing is
//! installed and rendering uses [`CalendarStyles::plain`].

use crossterm::tty::IsTty;
use std::ffi::OsStr;
use once_cell::sync::OnceCell;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::BorderType;

use crate::theme::ThemeConfig;

pub const STYLE_ID: &str = "smartcal-styles";

static STYLES: OnceCell<CalendarStyles> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarStyles {
    pub root:        Style,
    pub border:      Style,
    pub border_type: BorderType,
    pub header:      Style,
    pub nav:         Style,
    pub weekday:     Style,
    pub weekend_hdr: Style,
    pub day:         Style,
    pub weekend:     Style,
    pub other_month: Style,
    pub today:       Style,
    pub selected:    Style,
}

impl CalendarStyles {
    pub fn from_theme(t: &ThemeConfig) -> Self {
        let (today_bg, today_fg) = t.today_highlight();
        let (sel_bg, sel_fg)     = t.selected_highlight();
        Self {
            root:        Style::default().bg(t.bg()).fg(t.fg()),
            border:      Style::default().fg(t.border()),
            border_type: t.border_type(),
            header:      Style::default().fg(t.accent()).add_modifier(Modifier::BOLD),
            nav:         Style::default().fg(t.fg()),
            weekday:     Style::default().fg(t.fg_dim()).add_modifier(Modifier::BOLD),
            weekend_hdr: Style::default().fg(t.weekend_color()).add_modifier(Modifier::BOLD),
            day:         Style::default().fg(t.fg()),
            weekend:     Style::default().fg(t.weekend_color()),
            other_month: Style::default().fg(t.fg_dim()),
            today:       Style::default().bg(today_bg).fg(today_fg).add_modifier(Modifier::BOLD),
            selected:    Style::default().bg(sel_bg).fg(sel_fg).add_modifier(Modifier::BOLD),
        }
    }

    /// Colourless fallback; highlights survive as modifiers.
    pub fn plain() -> Self {
        Self {
            root:        Style::default(),
            border:      Style::default(),
            border_type: BorderType::Rounded,
            header:      Style::default().add_modifier(Modifier::BOLD),
            nav:         Style::default(),
            weekday:     Style::default().add_modifier(Modifier::BOLD),
            weekend_hdr: Style::default().add_modifier(Modifier::BOLD),
            day:         Style::default(),
            weekend:     Style::default(),
            other_month: Style::default().add_modifier(Modifier::DIM),
            today:       Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            selected:    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        }
    }
}

/// Whether stdout can show styles at all.
pub fn has_style_context() -> bool {
    style_context(std::env::var_os("NO_COLOR").as_deref(), std::io::stdout().is_tty())
}

/// An empty `NO_COLOR` counts as unset.
fn style_context(no_color: Option<&OsStr>, is_tty: bool) -> bool {
    let no_color = no_color.is_some_and(|v| !v.is_empty());
    !no_color && is_tty
}

/// Installs styles for `theme` unless some are already installed. Returns
/// whether this call did the installation.
pub fn inject_calendar_styles(theme: &ThemeConfig) -> bool {
    inject_into(&STYLES, has_style_context(), theme)
}

fn inject_into(cell: &OnceCell<CalendarStyles>, context: bool, theme: &ThemeConfig) -> bool {
    if !context {
        tracing::debug!("{STYLE_ID}: no style context, rendering plain");
        return false;
    }
    register(cell, theme)
}

fn register(cell: &OnceCell<CalendarStyles>, theme: &ThemeConfig) -> bool {
    let mut installed = false;
    cell.get_or_init(|| {
        installed = true;
        tracing::info!("{STYLE_ID}: registered theme {}", theme.name);
        CalendarStyles::from_theme(theme)
    });
    installed
}

/// Styles to render with: the registered set, or the plain fallback.
pub fn current() -> CalendarStyles {
    resolve(&STYLES)
}

fn resolve(cell: &OnceCell<CalendarStyles>) -> CalendarStyles {
    cell.get().copied().unwrap_or_else(CalendarStyles::plain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_register_runs_once() {
        let cell = OnceCell::new();
        assert!(register(&cell, &ThemeConfig::nord()));
        assert!(!register(&cell, &ThemeConfig::gruvbox()));
        assert_eq!(cell.get(), Some(&CalendarStyles::from_theme(&ThemeConfig::nord())));
    }

    #[test]
    fn test_no_color_disables_styles() {
        assert!(!style_context(Some(OsStr::new("1")), true));
        assert!(!style_context(Some(OsStr::new("anything")), true));
    }

    #[test]
    fn test_empty_no_color_is_unset() {
        assert!(style_context(Some(OsStr::new("")), true));
        assert!(style_context(None, true));
    }

    #[test]
    fn test_no_tty_disables_styles() {
        assert!(!style_context(None, false));
        assert!(!style_context(Some(OsStr::new("")), false));
    }

    #[test]
    fn test_inject_without_context_leaves_cell_empty() {
        let cell = OnceCell::new();
        assert!(!inject_into(&cell, false, &ThemeConfig::nord()));
        assert!(cell.get().is_none());
        assert_eq!(resolve(&cell), CalendarStyles::plain());

        assert!(inject_into(&cell, true, &ThemeConfig::nord()));
        assert!(!inject_into(&cell, true, &ThemeConfig::gruvbox()));
        assert_eq!(resolve(&cell), CalendarStyles::from_theme(&ThemeConfig::nord()));
    }

    #[test]
    fn test_from_theme_uses_selected_colors() {
        let s = CalendarStyles::from_theme(&ThemeConfig::paper());
        assert_eq!(s.selected.bg, Some(Color::Rgb(0x00, 0x7b, 0xff)));
        assert_eq!(s.today.fg, Some(Color::Rgb(0x28, 0xa7, 0x45)));
        assert_eq!(s.border_type, BorderType::Plain);
    }

    #[test]
    fn test_plain_keeps_highlights_distinct() {
        let s = CalendarStyles::plain();
        assert_ne!(s.selected, s.today);
        assert_ne!(s.other_month, s.day);
    }
}
