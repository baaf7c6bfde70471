//! Demo host: owns the selected date (and, when controlled, the view month)
//! and feeds them back into the calendar widget.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::sync::mpsc::{self, Receiver};

use smartcal::{
    calendar::{self, Month},
    config::AppConfig,
    theme::ThemeConfig,
    widget::{Calendar, CalendarProps},
};

use crate::ui::{self, draw};

// ─── Host events ──────────────────────────────────────────────────────────────

/// What the widget's callbacks report back to the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    DateChanged(NaiveDate),
    ViewChanged(Month),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Uncontrolled,
    Controlled,
}

// ─── App state ────────────────────────────────────────────────────────────────

pub struct App {
    pub calendar:      Calendar,
    pub mode:          Mode,
    pub theme:         ThemeConfig,
    pub selected_date: NaiveDate,
    /// Host-owned view month; only used when controlled.
    pub view_month:    Option<Month>,
    pub status:        String,
    pub show_help:     bool,
    pub running:       bool,
    /// Where the calendar was last drawn, for mouse hit-testing.
    pub calendar_area: Rect,
    events:            Receiver<HostEvent>,
}

impl App {
    pub fn new(cfg: &AppConfig, theme: ThemeConfig, mode: Mode, selected: NaiveDate) -> Self {
        let (tx, events) = mpsc::channel();

        let date_tx = tx.clone();
        let mut props = CalendarProps::new(selected)
            .week_start(cfg.week_start)
            .show_adjacent_days(cfg.show_adjacent_days)
            .year_span(cfg.year_span)
            .theme(theme.clone())
            .on_date_change(move |d| { let _ = date_tx.send(HostEvent::DateChanged(d)); });

        let view_month = match mode {
            Mode::Controlled => {
                let month = Month::of(selected);
                props = props
                    .view_date(month)
                    .on_view_change(move |m| { let _ = tx.send(HostEvent::ViewChanged(m)); });
                Some(month)
            }
            Mode::Uncontrolled => None,
        };

        Self {
            calendar: Calendar::new(props),
            mode,
            theme,
            selected_date: selected,
            view_month,
            status: String::new(),
            show_help: false,
            running: true,
            calendar_area: Rect::default(),
            events,
        }
    }

    // ── TUI loop ──────────────────────────────────────────────────────────────

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend  = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;

        let result = self.event_loop(&mut term);

        disable_raw_mode()?;
        execute!(term.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        term.show_cursor()?;
        result
    }

    fn event_loop(&mut self, term: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick = std::time::Duration::from_millis(50);
        while self.running {
            let mut cal_area = self.calendar_area;
            term.draw(|f| {
                cal_area = ui::calendar_area(f.area());
                draw(f, self);
            })?;
            self.calendar_area = cal_area;

            if event::poll(tick)? {
                match event::read()? {
                    Event::Key(key)     => self.on_key(key),
                    Event::Mouse(mouse) => self.on_mouse(mouse),
                    _ => {}
                }
            }
            self.pump();
        }
        tracing::info!("Leaving smartcal");
        Ok(())
    }

    /// Applies everything the widget reported since the last call, in order.
    pub fn pump(&mut self) {
        let pending: Vec<HostEvent> = self.events.try_iter().collect();
        for ev in pending { self.on_host_event(ev); }
    }

    fn on_host_event(&mut self, ev: HostEvent) {
        match ev {
            HostEvent::DateChanged(date) => self.select(date),
            HostEvent::ViewChanged(month) => {
                self.view_month = Some(month);
                self.calendar.set_view_date(month);
                self.status = format!("view → {month}");
            }
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('t') => self.select(calendar::today()),
            KeyCode::Char('l') => self.shift_day(1),
            KeyCode::Char('h') => self.shift_day(-1),
            KeyCode::Char('j') | KeyCode::Down => self.shift_day(7),
            KeyCode::Char('k') | KeyCode::Up   => self.shift_day(-7),
            _ => { self.calendar.handle_key(key); }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        self.calendar.handle_mouse(mouse, self.calendar_area);
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn shift_day(&mut self, d: i64) {
        self.select(self.selected_date + Duration::days(d));
    }

    /// The host's own date change: store it and hand it to the widget.
    fn select(&mut self, date: NaiveDate) {
        self.selected_date = date;
        if self.calendar.set_date(date) {
            tracing::debug!("calendar followed selection to {}", self.calendar.displayed_month());
        }
        self.status = format!("selected {}", date.format("%Y-%m-%d"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn app(mode: Mode) -> App {
        App::new(&AppConfig::default(), ThemeConfig::default(), mode, d(2024, 1, 15))
    }

    #[test]
    fn test_week_shift_crosses_month_and_resyncs() {
        let mut app = app(Mode::Uncontrolled);
        for _ in 0..3 { app.on_key(key('j')); }
        assert_eq!(app.selected_date, d(2024, 2, 5));
        assert_eq!(app.calendar.displayed_month(), Month::new(2024, 1));
        assert_eq!(app.status, "selected 2024-02-05");
    }

    #[test]
    fn test_controlled_navigation_roundtrips_through_host() {
        let mut app = app(Mode::Controlled);
        app.on_key(key(']'));
        assert_eq!(app.calendar.displayed_month(), Month::new(2024, 0));
        app.pump();
        assert_eq!(app.view_month, Some(Month::new(2024, 1)));
        assert_eq!(app.calendar.displayed_month(), Month::new(2024, 1));
    }

    #[test]
    fn test_controlled_selection_does_not_move_view() {
        let mut app = app(Mode::Controlled);
        for _ in 0..3 { app.on_key(key('j')); }
        assert_eq!(app.selected_date, d(2024, 2, 5));
        assert_eq!(app.calendar.displayed_month(), Month::new(2024, 0));
    }

    #[test]
    fn test_click_goes_through_host() {
        let mut app = app(Mode::Uncontrolled);
        app.calendar_area = Rect::new(0, 0, smartcal::widget::CALENDAR_WIDTH, smartcal::widget::CALENDAR_HEIGHT);
        let target = app.calendar.layout(app.calendar_area).cell_for("2024-01-20").unwrap().area;
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: target.x,
            row: target.y,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.selected_date, d(2024, 1, 15));
        app.pump();
        assert_eq!(app.selected_date, d(2024, 1, 20));
        assert_eq!(app.calendar.date(), d(2024, 1, 20));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app(Mode::Uncontrolled);
        app.on_key(key('?'));
        assert!(app.show_help);
        app.on_key(key('q'));
        assert!(!app.show_help);
        assert!(app.running);
        app.on_key(key('q'));
        assert!(!app.running);
    }
}
