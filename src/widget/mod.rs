//! The calendar widget: props, instance state, layout hooks and rendering.

use chrono::{Datelike, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Widget},
};
use std::fmt;
use std::ops::RangeInclusive;

use crate::calendar::{
    self, compute_grid_with, month_name, weekday_names, CalendarGrid, GridCell, Month, WeekStart,
    GRID_CELLS, WEEK_DAYS,
};
use crate::styles::{self, CalendarStyles};
use crate::theme::ThemeConfig;
use crate::view::{ViewChangeFn, ViewState, ViewUpdate};

/// Columns per day cell.
pub const CELL_WIDTH: u16 = 5;
/// Outer size that fits the whole widget: borders, header, weekdays, 6 rows.
pub const CALENDAR_WIDTH:  u16 = CELL_WIDTH * WEEK_DAYS as u16 + 2;
pub const CALENDAR_HEIGHT: u16 = 6 + 4;

const NAV_WIDTH: u16 = 3;

/// Host callback receiving picked dates.
pub type DateChangeFn = Box<dyn FnMut(NaiveDate)>;

// ─── Props ────────────────────────────────────────────────────────────────────

/// Construction record for a [`Calendar`].
pub struct CalendarProps {
    date:               NaiveDate,
    on_date_change:     Option<DateChangeFn>,
    view_date:          Option<Month>,
    on_view_change:     Option<ViewChangeFn>,
    week_start:         WeekStart,
    show_adjacent_days: bool,
    year_span:          u32,
    today:              Option<NaiveDate>,
    theme:              ThemeConfig,
}

impl CalendarProps {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            on_date_change:     None,
            view_date:          None,
            on_view_change:     None,
            week_start:         WeekStart::Sunday,
            show_adjacent_days: true,
            year_span:          20,
            today:              None,
            theme:              ThemeConfig::default(),
        }
    }

    /// Makes date cells interactive.
    pub fn on_date_change(mut self, f: impl FnMut(NaiveDate) + 'static) -> Self {
        self.on_date_change = Some(Box::new(f));
        self
    }

    /// Puts the calendar in controlled mode showing `month`.
    pub fn view_date(mut self, month: Month) -> Self {
        self.view_date = Some(month);
        self
    }

    pub fn on_view_change(mut self, f: impl FnMut(Month) + 'static) -> Self {
        self.on_view_change = Some(Box::new(f));
        self
    }

    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn show_adjacent_days(mut self, show: bool) -> Self {
        self.show_adjacent_days = show;
        self
    }

    pub fn year_span(mut self, span: u32) -> Self {
        self.year_span = span;
        self
    }

    /// Pins "today" instead of reading the system clock.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn theme(mut self, theme: ThemeConfig) -> Self {
        self.theme = theme;
        self
    }
}

// ─── Instance ─────────────────────────────────────────────────────────────────

pub struct Calendar {
    date:               NaiveDate,
    on_date_change:     Option<DateChangeFn>,
    view:               ViewState,
    week_start:         WeekStart,
    show_adjacent_days: bool,
    year_span:          u32,
    today:              Option<NaiveDate>,
}

impl fmt::Debug for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calendar")
            .field("date", &self.date)
            .field("interactive", &self.is_interactive())
            .field("view", &self.view)
            .field("week_start", &self.week_start)
            .finish_non_exhaustive()
    }
}

impl Calendar {
    pub fn new(props: CalendarProps) -> Self {
        styles::inject_calendar_styles(&props.theme);

        let view = match props.view_date {
            Some(month) => ViewState::controlled(month, props.on_view_change),
            None        => ViewState::uncontrolled(props.date),
        };
        tracing::debug!(
            "calendar mounted on {} ({})",
            view.displayed_month(),
            if view.is_controlled() { "controlled" } else { "uncontrolled" }
        );

        Self {
            date:               props.date,
            on_date_change:     props.on_date_change,
            view,
            week_start:         props.week_start,
            show_adjacent_days: props.show_adjacent_days,
            year_span:          props.year_span,
            today:              props.today,
        }
    }

    pub fn date(&self)            -> NaiveDate { self.date }
    pub fn displayed_month(&self) -> Month     { self.view.displayed_month() }
    pub fn is_controlled(&self)   -> bool      { self.view.is_controlled() }
    pub fn is_interactive(&self)  -> bool      { self.on_date_change.is_some() }
    pub fn view(&self)            -> &ViewState { &self.view }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(calendar::today)
    }

    // ── Host updates ──────────────────────────────────────────────────────────

    /// The host passes a (possibly) new selected date. An uncontrolled view
    /// follows it when the selection moves to another month.
    pub fn set_date(&mut self, date: NaiveDate) -> bool {
        let month_changed = Month::of(date) != Month::of(self.date);
        self.date = date;
        month_changed && self.view.sync_selected_date(date)
    }

    /// The host re-supplies its view month (controlled mode).
    pub fn set_view_date(&mut self, month: Month) -> bool {
        self.view.supply_view_month(month)
    }

    // ── User actions ──────────────────────────────────────────────────────────

    pub fn prev_month(&mut self) -> ViewUpdate { self.view.prev_month() }
    pub fn next_month(&mut self) -> ViewUpdate { self.view.next_month() }
    pub fn pick_month(&mut self, index: u32) -> ViewUpdate { self.view.pick_month(index) }
    pub fn pick_year(&mut self, year: i32) -> ViewUpdate { self.view.pick_year(year) }

    /// Reports `date` to the host. The view is left alone; if the host accepts
    /// the date it comes back through [`Calendar::set_date`].
    pub fn click_date(&mut self, date: NaiveDate) -> bool {
        match &mut self.on_date_change {
            Some(cb) => {
                tracing::debug!("date picked: {date}");
                cb(date);
                true
            }
            None => false,
        }
    }

    /// Years the year picker offers.
    pub fn year_options(&self) -> RangeInclusive<i32> {
        calendar::year_options(self.today().year(), self.year_span, self.displayed_month().year())
    }

    fn step_month_picker(&mut self, delta: i32) -> ViewUpdate {
        let index = self.displayed_month().index() as i32 + delta;
        self.pick_month(index.rem_euclid(12) as u32)
    }

    fn step_year_picker(&mut self, delta: i32) -> ViewUpdate {
        let opts = self.year_options();
        let year = (self.displayed_month().year() + delta).clamp(*opts.start(), *opts.end());
        self.pick_year(year)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char('[') | KeyCode::Left  => { self.prev_month(); }
            KeyCode::Char(']') | KeyCode::Right => { self.next_month(); }
            KeyCode::Char('m') => { self.step_month_picker(1); }
            KeyCode::Char('M') => { self.step_month_picker(-1); }
            KeyCode::Char('y') => { self.step_year_picker(1); }
            KeyCode::Char('Y') => { self.step_year_picker(-1); }
            _ => return false,
        }
        true
    }

    /// Mouse handling against the widget rendered in `area`.
    pub fn handle_mouse(&mut self, ev: MouseEvent, area: Rect) -> bool {
        let layout = self.layout(area);
        let (x, y) = (ev.column, ev.row);
        let delta = match ev.kind {
            MouseEventKind::ScrollUp   => -1,
            MouseEventKind::ScrollDown => 1,
            MouseEventKind::Down(MouseButton::Left) => 0,
            _ => return false,
        };

        if contains(layout.month_picker, x, y) {
            self.step_month_picker(if delta == 0 { 1 } else { delta });
            return true;
        }
        if contains(layout.year_picker, x, y) {
            self.step_year_picker(if delta == 0 { 1 } else { delta });
            return true;
        }
        if delta != 0 {
            return false;
        }
        if contains(layout.prev_button, x, y) {
            self.prev_month();
            return true;
        }
        if contains(layout.next_button, x, y) {
            self.next_month();
            return true;
        }
        match layout.cell_at(x, y) {
            Some(region) if self.cell_visible(&region.cell) => {
                let date = region.cell.date;
                self.click_date(date)
            }
            _ => false,
        }
    }

    fn cell_visible(&self, cell: &GridCell) -> bool {
        cell.in_current_month || self.show_adjacent_days
    }

    // ── Grid and layout ───────────────────────────────────────────────────────

    /// The displayed month's grid with selection and today marked.
    pub fn grid(&self) -> CalendarGrid {
        compute_grid_with(self.displayed_month(), self.week_start).highlight(self.date, self.today())
    }

    pub fn layout(&self, area: Rect) -> CalendarLayout {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let row = |dy: u16| Rect {
            x:      inner.x,
            y:      inner.y.saturating_add(dy),
            width:  inner.width,
            height: u16::from(dy < inner.height),
        };

        let header   = row(0);
        let weekdays = row(1);
        let grid = Rect {
            x:      inner.x,
            y:      inner.y.saturating_add(2),
            width:  inner.width.min(CELL_WIDTH * WEEK_DAYS as u16),
            height: inner.height.saturating_sub(2).min((GRID_CELLS / WEEK_DAYS) as u16),
        };

        let nav_w       = NAV_WIDTH.min(header.width / 2);
        let prev_button = Rect { width: nav_w, ..header };
        let next_button = Rect { x: header.right().saturating_sub(nav_w), width: nav_w, ..header };

        let month   = self.displayed_month();
        let m_label = month_name(month.index()).len() as u16;
        let y_label = month.year().to_string().len() as u16;
        let start   = header.x + header.width.saturating_sub(m_label + 1 + y_label) / 2;
        let month_picker = Rect { x: start, width: m_label, ..header }.intersection(header);
        let year_picker  = Rect { x: start + m_label + 1, width: y_label, ..header }.intersection(header);

        let cells = self
            .grid()
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| {
                let col  = (i % WEEK_DAYS) as u16;
                let line = (i / WEEK_DAYS) as u16;
                let rect = Rect {
                    x:      grid.x.saturating_add(col * CELL_WIDTH),
                    y:      grid.y.saturating_add(line),
                    width:  CELL_WIDTH,
                    height: 1,
                }
                .intersection(grid);
                (!rect.is_empty()).then_some(CellRegion { area: rect, cell: *cell })
            })
            .collect();

        CalendarLayout {
            root: area,
            header,
            prev_button,
            next_button,
            month_picker,
            year_picker,
            weekdays,
            grid,
            cells,
        }
    }

    fn cell_style(&self, cell: &GridCell, s: &CalendarStyles) -> Style {
        if cell.is_selected {
            s.selected
        } else if cell.is_today {
            s.today
        } else if !cell.in_current_month {
            s.other_month
        } else if cell.is_weekend() {
            s.weekend
        } else {
            s.day
        }
    }
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.right() && y >= r.y && y < r.bottom()
}

// ─── Layout hooks ─────────────────────────────────────────────────────────────

/// A drawn grid cell and the date it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRegion {
    pub area: Rect,
    pub cell: GridCell,
}

/// Where each part of the widget lands for a given area. Region ids match
/// [`CalendarLayout::region`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLayout {
    pub root:         Rect,
    pub header:       Rect,
    pub prev_button:  Rect,
    pub next_button:  Rect,
    pub month_picker: Rect,
    pub year_picker:  Rect,
    pub weekdays:     Rect,
    pub grid:         Rect,
    pub cells:        Vec<CellRegion>,
}

impl CalendarLayout {
    /// Looks up a region by its stable id: `calendar`, `calendar-header`,
    /// `calendar-weekdays`, `calendar-grid` or `selected-date`.
    pub fn region(&self, id: &str) -> Option<Rect> {
        match id {
            "calendar"          => Some(self.root),
            "calendar-header"   => Some(self.header),
            "calendar-weekdays" => Some(self.weekdays),
            "calendar-grid"     => Some(self.grid),
            "selected-date"     => self.selected().map(|r| r.area),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&CellRegion> {
        self.cells.iter().find(|r| r.cell.is_selected)
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<&CellRegion> {
        self.cells.iter().find(|r| contains(r.area, x, y))
    }

    /// Finds the cell whose date renders as `iso` (`YYYY-MM-DD`).
    pub fn cell_for(&self, iso: &str) -> Option<&CellRegion> {
        self.cells.iter().find(|r| r.cell.iso_date() == iso)
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

impl Widget for &Calendar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s      = styles::current();
        let layout = self.layout(area);
        let month  = self.displayed_month();

        Block::default()
            .borders(Borders::ALL)
            .border_type(s.border_type)
            .border_style(s.border)
            .style(s.root)
            .render(area, buf);

        if layout.header.is_empty() {
            return;
        }

        // Header: ‹  Month Year  ›
        let h = layout.header;
        buf.set_stringn(layout.prev_button.x, h.y, " ‹ ", layout.prev_button.width as usize, s.nav);
        buf.set_stringn(layout.next_button.x, h.y, " › ", layout.next_button.width as usize, s.nav);
        buf.set_stringn(
            layout.month_picker.x, h.y, month.name(), layout.month_picker.width as usize, s.header,
        );
        buf.set_stringn(
            layout.year_picker.x, h.y, month.year().to_string(), layout.year_picker.width as usize, s.header,
        );

        // Weekday names
        if !layout.weekdays.is_empty() {
            for (i, name) in weekday_names(self.week_start).iter().enumerate() {
                let x = layout.weekdays.x.saturating_add(i as u16 * CELL_WIDTH);
                if x >= layout.weekdays.right() { break; }
                let weekend = *name == "Sat" || *name == "Sun";
                let style   = if weekend { s.weekend_hdr } else { s.weekday };
                let max     = (layout.weekdays.right() - x).min(CELL_WIDTH) as usize;
                buf.set_stringn(x, layout.weekdays.y, format!("{name:^5}"), max, style);
            }
        }

        // Day cells
        for region in &layout.cells {
            let cell  = &region.cell;
            let label = if self.cell_visible(cell) {
                format!("{:^5}", cell.day())
            } else {
                " ".repeat(CELL_WIDTH as usize)
            };
            let style = if self.cell_visible(cell) { self.cell_style(cell, &s) } else { s.root };
            buf.set_stringn(region.area.x, region.area.y, label, region.area.width as usize, style);
        }
    }
}

/// Renders the widget off-screen and returns its rows as text.
pub fn render_lines(calendar: &Calendar, width: u16, height: u16) -> Vec<String> {
    let area   = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    calendar.render(area, &mut buf);
    buffer_lines(&buf)
}

pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (area.y..area.bottom())
        .map(|y| (area.x..area.right()).map(|x| buf[(x, y)].symbol()).collect::<String>())
        .collect()
}
