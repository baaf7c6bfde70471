//! Pure month-grid arithmetic.
//!
//! Everything here is total: months wrap with euclidean arithmetic and years
//! are clamped to the span chrono can represent, so no function returns an
//! error for calendar input.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// 6 rows × 7 columns.
pub const GRID_CELLS: usize = 42;
pub const WEEK_DAYS:  usize = 7;

// One year of headroom inside chrono's range so adjacent months always exist.
const MIN_YEAR: i32 = -262_000;
const MAX_YEAR: i32 =  262_000;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March",     "April",   "May",      "June",
    "July",    "August",   "September", "October", "November", "December",
];

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ─── Week start ───────────────────────────────────────────────────────────────

/// Which weekday occupies the first grid column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column (0..7) of `weekday` under this week start.
    pub fn column(self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        }
    }
}

// ─── Month ────────────────────────────────────────────────────────────────────

/// A (year, month) pair. `index` is 0-based: 0 = January … 11 = December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year:  i32,
    index: u32,
}

impl Month {
    /// Builds a month from any integer pair, wrapping `month` into the year
    /// (`Month::new(2024, -1)` is December 2023).
    pub fn new(year: i32, month: i32) -> Self {
        // Saturates at January MIN_YEAR and December MAX_YEAR.
        let total = (i64::from(year) * 12 + i64::from(month))
            .clamp(i64::from(MIN_YEAR) * 12, i64::from(MAX_YEAR) * 12 + 11);
        let year  = total.div_euclid(12) as i32;
        let index = total.rem_euclid(12) as u32;
        Self { year, index }
    }

    /// The month a date falls in.
    pub fn of(date: impl Datelike) -> Self {
        Self::new(date.year(), date.month0() as i32)
    }

    pub fn year(&self)  -> i32 { self.year }
    pub fn index(&self) -> u32 { self.index }
    /// 1-based month number, as chrono counts them.
    pub fn number(&self) -> u32 { self.index + 1 }

    pub fn prev(self) -> Self { Self::new(self.year, self.index as i32 - 1) }
    pub fn next(self) -> Self { Self::new(self.year, self.index as i32 + 1) }

    /// Same year, different month.
    pub fn with_index(self, index: u32) -> Self {
        Self::new(self.year, index.min(11) as i32)
    }

    /// Same month, different year.
    pub fn with_year(self, year: i32) -> Self {
        Self::new(year, self.index as i32)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1)
            .expect("month year is clamped inside chrono's range")
    }

    pub fn days(&self) -> u32 { days_in_month(self.year, self.index) }

    /// Weekday of the 1st, 0 = Sunday … 6 = Saturday.
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: impl Datelike) -> bool {
        date.year() == self.year && date.month0() == self.index
    }

    pub fn name(&self) -> &'static str { month_name(self.index) }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a month as YYYY-MM, got {0:?}")]
pub struct ParseMonthError(String);

impl FromStr for Month {
    type Err = ParseMonthError;

    /// Parses `YYYY-MM` (1-based month).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_owned());
        let (y, m) = s.trim().rsplit_once('-').ok_or_else(err)?;
        let year:  i32 = y.parse().map_err(|_| err())?;
        let month: u32 = m.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Month::new(year, month as i32 - 1))
    }
}

// ─── Arithmetic ───────────────────────────────────────────────────────────────

/// Gregorian rule: divisible by 4, not by 100 unless by 400.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in a month; `month0` is 0-based.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 % 12 {
        1 if is_leap_year(year) => 29,
        1                       => 28,
        3 | 5 | 8 | 10          => 30,
        _                       => 31,
    }
}

// ─── Grid ─────────────────────────────────────────────────────────────────────

/// One slot of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date:             NaiveDate,
    pub in_current_month: bool,
    pub is_today:         bool,
    pub is_selected:      bool,
}

impl GridCell {
    pub fn day(&self) -> u32 { self.date.day() }

    /// Canonical `YYYY-MM-DD` form of the cell's date.
    pub fn iso_date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.date.year(), self.date.month(), self.date.day())
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Classification tags, in a stable order.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut out = vec![
            "calendar-day",
            if self.in_current_month { "current-month" } else { "other-month" },
        ];
        if self.is_today    { out.push("today"); }
        if self.is_selected { out.push("selected"); }
        out
    }
}

/// The 42 consecutive days shown for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    month:      Month,
    week_start: WeekStart,
    cells:      Vec<GridCell>,
}

/// Sunday-first grid for `month`.
pub fn compute_grid(month: Month) -> CalendarGrid {
    compute_grid_with(month, WeekStart::Sunday)
}

pub fn compute_grid_with(month: Month, week_start: WeekStart) -> CalendarGrid {
    let first   = month.first_day();
    let leading = week_start.column(first.weekday());
    let start   = first - Duration::days(i64::from(leading));

    let cells = start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| GridCell {
            date,
            in_current_month: is_current_month(date, month),
            is_today:         false,
            is_selected:      false,
        })
        .collect();

    CalendarGrid { month, week_start, cells }
}

impl CalendarGrid {
    pub fn month(&self)      -> Month      { self.month }
    pub fn week_start(&self) -> WeekStart  { self.week_start }
    pub fn cells(&self)      -> &[GridCell] { &self.cells }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(WEEK_DAYS)
    }

    /// Tags the selected day and today.
    pub fn highlight(mut self, selected: NaiveDate, today: NaiveDate) -> Self {
        for cell in &mut self.cells {
            cell.is_selected = is_selected(cell.date, selected);
            cell.is_today    = is_today_at(cell.date, today);
        }
        self
    }

    /// Number of previous-month days before the 1st.
    pub fn leading_days(&self) -> usize {
        self.cells.iter().take_while(|c| !c.in_current_month).count()
    }

    /// Number of next-month days after the last day.
    pub fn trailing_days(&self) -> usize {
        self.cells.iter().rev().take_while(|c| !c.in_current_month).count()
    }

    /// The displayed month's own days.
    pub fn current_month_run(&self) -> &[GridCell] {
        let start = self.leading_days();
        &self.cells[start..self.cells.len() - self.trailing_days()]
    }

    pub fn first_date(&self) -> Option<NaiveDate> { self.cells.first().map(|c| c.date) }
    pub fn last_date(&self)  -> Option<NaiveDate> { self.cells.last().map(|c| c.date) }

    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.cells.iter().position(|c| c.date == date)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&GridCell> {
        self.position(date).map(|i| &self.cells[i])
    }

    pub fn selected_cell(&self) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.is_selected)
    }

    pub fn today_cell(&self) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.is_today)
    }
}

// ─── Predicates ───────────────────────────────────────────────────────────────

/// Equality on (year, month, day); any time-of-day component is ignored.
pub fn is_same_day(a: impl Datelike, b: impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

pub fn is_selected(date: impl Datelike, selected: impl Datelike) -> bool {
    is_same_day(date, selected)
}

/// The local system date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_today(date: impl Datelike) -> bool {
    is_today_at(date, today())
}

pub fn is_today_at(date: impl Datelike, today: impl Datelike) -> bool {
    is_same_day(date, today)
}

pub fn is_current_month(date: impl Datelike, month: Month) -> bool {
    month.contains(date)
}

// ─── Naming ───────────────────────────────────────────────────────────────────

/// Weekday header labels in column order.
pub fn weekday_names(week_start: WeekStart) -> [&'static str; 7] {
    let mut names = DAY_NAMES;
    if week_start == WeekStart::Monday {
        names.rotate_left(1);
    }
    names
}

/// English month name for a 0-based index.
pub fn month_name(index: u32) -> &'static str {
    MONTH_NAMES[(index % 12) as usize]
}

/// e.g. "January 2024".
pub fn format_month_year(month: Month) -> String {
    month.to_string()
}

/// Years offered by the year picker: `center ± span`, stretched to cover
/// `displayed` when the view has been navigated outside that window.
pub fn year_options(center: i32, span: u32, displayed: i32) -> RangeInclusive<i32> {
    let span = span.min(i32::MAX as u32) as i32;
    let lo   = center.saturating_sub(span).min(displayed);
    let hi   = center.saturating_add(span).max(displayed);
    lo..=hi
}
