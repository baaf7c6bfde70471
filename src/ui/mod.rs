use chrono::Datelike;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Mode};
use smartcal::widget::{CALENDAR_HEIGHT, CALENDAR_WIDTH};

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Fill background
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg()).fg(app.theme.fg())),
        area,
    );

    let root = split_root(area);
    let cal  = calendar_area(area);

    f.render_widget(&app.calendar, cal);
    draw_selection(f, app, Rect { y: cal.bottom(), height: 1, ..cal }.intersection(root[0]));
    draw_statusbar(f, app, root[1]);

    if app.show_help {
        draw_help(f, area, app);
    }
}

// Layout: [ content | status_bar(1) ]
fn split_root(area: Rect) -> [Rect; 2] {
    Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .areas(area)
}

/// Where the calendar widget is drawn inside a terminal of size `area`.
pub fn calendar_area(area: Rect) -> Rect {
    let content = split_root(area)[0];
    let [col] = Layout::horizontal([Constraint::Length(CALENDAR_WIDTH)])
        .flex(Flex::Center)
        .areas(content);
    let [cal] = Layout::vertical([Constraint::Length(CALENDAR_HEIGHT + 1)])
        .flex(Flex::Center)
        .areas(col);
    Rect { height: cal.height.min(CALENDAR_HEIGHT), ..cal }
}

// ─── Selected date line ───────────────────────────────────────────────────────

fn draw_selection(f: &mut Frame, app: &App, area: Rect) {
    let t    = &app.theme;
    let date = app.selected_date;
    let text = format!("{}, {} {}, {}", date.format("%A"), date.format("%B"), date.day(), date.year());
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(t.fg_dim()))))
            .alignment(Alignment::Center),
        area,
    );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let (mode_str, mode_style) = match app.mode {
        Mode::Uncontrolled => (" UNCONTROLLED ", Style::default().bg(t.accent()).fg(t.bg()).add_modifier(Modifier::BOLD)),
        Mode::Controlled   => (" CONTROLLED ",   Style::default().bg(t.weekend_color()).fg(t.bg()).add_modifier(Modifier::BOLD)),
    };
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(mode_str, mode_style),
        Span::styled(
            "  hjkl:day/week  [ ]:month  m/M:pick month  y/Y:pick year  t:today  ?:help  q:quit",
            Style::default().fg(t.fg_dim()),
        ),
        Span::styled(
            format!("  {}", app.status),
            Style::default().fg(t.fg_dim()).add_modifier(Modifier::ITALIC),
        ),
    ])).style(Style::default().bg(t.bg2()));
    f.render_widget(bar, area);
}

// ─── Help overlay ─────────────────────────────────────────────────────────────

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let t    = &app.theme;
    let rect = centered(60, 70, area);
    f.render_widget(Clear, rect);

    let title = Line::from(Span::styled(
        " Keyboard Shortcuts ",
        Style::default().fg(t.accent()).add_modifier(Modifier::BOLD),
    ));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(t.border()))
        .style(Style::default().bg(t.bg2()));

    let accent = Style::default().fg(t.accent()).add_modifier(Modifier::BOLD);
    let dim    = Style::default().fg(t.fg_dim());
    let lines  = vec![
        Line::from(""),
        Line::from(Span::styled("  Selection (host)", accent)),
        Line::from(Span::styled("  h / l              Previous / next day", dim)),
        Line::from(Span::styled("  j / k  ↓ / ↑       Next / previous week", dim)),
        Line::from(Span::styled("  t                  Jump to today", dim)),
        Line::from(Span::styled("  click              Pick a date", dim)),
        Line::from(""),
        Line::from(Span::styled("  View (calendar)", accent)),
        Line::from(Span::styled("  [ / ]  ← / →       Previous / next month", dim)),
        Line::from(Span::styled("  m / M              Pick next / previous month", dim)),
        Line::from(Span::styled("  y / Y              Pick next / previous year", dim)),
        Line::from(Span::styled("  click / scroll     Arrows, month and year pickers", dim)),
        Line::from(""),
        Line::from(Span::styled("  General", accent)),
        Line::from(Span::styled("  ?                  Toggle help", dim)),
        Line::from(Span::styled("  q / Esc            Quit", dim)),
    ];
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn centered(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let vert = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ]).split(r);
    Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ]).split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_area_is_centered_and_fits() {
        let cal = calendar_area(Rect::new(0, 0, 80, 24));
        assert_eq!(cal.width, CALENDAR_WIDTH);
        assert_eq!(cal.height, CALENDAR_HEIGHT);
        let slack = 80 - CALENDAR_WIDTH;
        assert!(cal.x == slack / 2 || cal.x == slack / 2 + 1);
    }

    #[test]
    fn test_calendar_area_shrinks_in_tiny_terminal() {
        let cal = calendar_area(Rect::new(0, 0, 20, 5));
        assert!(cal.width <= 20);
        assert!(cal.height <= 4);
    }
}
