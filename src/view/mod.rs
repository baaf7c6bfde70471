//! Displayed-month state, owned either by the widget or by its host.

use chrono::Datelike;
use std::fmt;

use crate::calendar::Month;

/// Host callback receiving requested view months in controlled mode.
pub type ViewChangeFn = Box<dyn FnMut(Month)>;

/// Who owns the displayed month. Fixed for the lifetime of a [`ViewState`].
pub enum ViewOwnership {
    /// Uncontrolled: the widget keeps the month itself.
    Internal(Month),
    /// Controlled: the host supplies `month` and receives change requests.
    External {
        month:     Month,
        on_change: Option<ViewChangeFn>,
    },
}

impl fmt::Debug for ViewOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewOwnership::Internal(m) => f.debug_tuple("Internal").field(m).finish(),
            ViewOwnership::External { month, on_change } => f
                .debug_struct("External")
                .field("month", month)
                .field("on_change", &on_change.is_some())
                .finish(),
        }
    }
}

/// What a navigation request resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    /// The internal month changed.
    Moved(Month),
    /// The host was asked to show this month.
    Requested(Month),
    /// Controlled without a callback; nothing happened.
    Dropped(Month),
    /// The target equals the displayed month.
    Unchanged,
}

#[derive(Debug)]
pub struct ViewState {
    ownership: ViewOwnership,
}

impl ViewState {
    /// Uncontrolled state showing the month of `selected`.
    pub fn uncontrolled(selected: impl Datelike) -> Self {
        Self { ownership: ViewOwnership::Internal(Month::of(selected)) }
    }

    /// Controlled state showing the host-owned `month`.
    pub fn controlled(month: Month, on_change: Option<ViewChangeFn>) -> Self {
        Self { ownership: ViewOwnership::External { month, on_change } }
    }

    pub fn displayed_month(&self) -> Month {
        match &self.ownership {
            ViewOwnership::Internal(m)              => *m,
            ViewOwnership::External { month, .. }   => *month,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.ownership, ViewOwnership::External { .. })
    }

    pub fn ownership(&self) -> &ViewOwnership { &self.ownership }

    // ── Navigation ────────────────────────────────────────────────────────────

    pub fn prev_month(&mut self) -> ViewUpdate {
        let target = self.displayed_month().prev();
        self.request(target)
    }

    pub fn next_month(&mut self) -> ViewUpdate {
        let target = self.displayed_month().next();
        self.request(target)
    }

    /// Picks a month (0-based) within the displayed year.
    pub fn pick_month(&mut self, index: u32) -> ViewUpdate {
        let target = self.displayed_month().with_index(index);
        self.request(target)
    }

    /// Picks a year, keeping the displayed month.
    pub fn pick_year(&mut self, year: i32) -> ViewUpdate {
        let target = self.displayed_month().with_year(year);
        self.request(target)
    }

    fn request(&mut self, target: Month) -> ViewUpdate {
        if target == self.displayed_month() {
            return ViewUpdate::Unchanged;
        }
        match &mut self.ownership {
            ViewOwnership::Internal(m) => {
                *m = target;
                tracing::debug!("view moved to {target}");
                ViewUpdate::Moved(target)
            }
            ViewOwnership::External { on_change: Some(cb), .. } => {
                tracing::debug!("view change requested: {target}");
                cb(target);
                ViewUpdate::Requested(target)
            }
            ViewOwnership::External { on_change: None, .. } => {
                tracing::debug!("view change to {target} dropped: no handler");
                ViewUpdate::Dropped(target)
            }
        }
    }

    // ── Host-driven updates ───────────────────────────────────────────────────

    /// Follows a selected date set by the host. Only uncontrolled views move,
    /// and only when the date's month differs from the displayed one.
    pub fn sync_selected_date(&mut self, selected: impl Datelike) -> bool {
        let ViewOwnership::Internal(m) = &mut self.ownership else {
            return false;
        };
        let target = Month::of(selected);
        if *m == target {
            return false;
        }
        tracing::debug!("resync view {m} -> {target}");
        *m = target;
        true
    }

    /// The host re-supplies the month it owns. Ignored for uncontrolled views;
    /// switching ownership after construction is not supported.
    pub fn supply_view_month(&mut self, month: Month) -> bool {
        match &mut self.ownership {
            ViewOwnership::External { month: current, .. } => {
                let changed = *current != month;
                *current = month;
                changed
            }
            ViewOwnership::Internal(_) => {
                tracing::warn!("ignoring view month {month} for an uncontrolled calendar");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn recorder() -> (Rc<RefCell<Vec<Month>>>, ViewChangeFn) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, Box::new(move |m| sink.borrow_mut().push(m)))
    }

    #[test]
    fn test_init_uses_selected_month() {
        let view = ViewState::uncontrolled(d(2024, 1, 15));
        assert_eq!(view.displayed_month(), Month::new(2024, 0));
        assert!(!view.is_controlled());
    }

    #[test]
    fn test_prev_from_january_wraps_year() {
        let mut view = ViewState::uncontrolled(d(2024, 1, 15));
        assert_eq!(view.prev_month(), ViewUpdate::Moved(Month::new(2023, 11)));
        assert_eq!(view.displayed_month(), Month::new(2023, 11));
    }

    #[test]
    fn test_next_from_december_wraps_year() {
        let mut view = ViewState::uncontrolled(d(2023, 12, 31));
        view.next_month();
        assert_eq!(view.displayed_month(), Month::new(2024, 0));
    }

    #[test]
    fn test_pick_month_and_year_uncontrolled() {
        let mut view = ViewState::uncontrolled(d(2024, 3, 10));
        view.pick_month(8);
        assert_eq!(view.displayed_month(), Month::new(2024, 8));
        view.pick_year(2010);
        assert_eq!(view.displayed_month(), Month::new(2010, 8));
        assert_eq!(view.pick_year(2010), ViewUpdate::Unchanged);
    }

    #[test]
    fn test_uncontrolled_resync_on_external_date() {
        let mut view = ViewState::uncontrolled(d(2024, 1, 15));
        assert!(view.sync_selected_date(d(2024, 6, 1)));
        assert_eq!(view.displayed_month(), Month::new(2024, 5));
    }

    #[test]
    fn test_resync_skipped_when_month_unchanged() {
        let mut view = ViewState::uncontrolled(d(2024, 1, 15));
        assert!(!view.sync_selected_date(d(2024, 1, 28)));
        assert_eq!(view.displayed_month(), Month::new(2024, 0));
    }

    #[test]
    fn test_controlled_next_requests_without_mutating() {
        let (log, cb) = recorder();
        let mut view = ViewState::controlled(Month::new(2024, 2), Some(cb));
        assert_eq!(view.next_month(), ViewUpdate::Requested(Month::new(2024, 3)));
        assert_eq!(*log.borrow(), vec![Month::new(2024, 3)]);
        assert_eq!(view.displayed_month(), Month::new(2024, 2));

        assert!(view.supply_view_month(Month::new(2024, 3)));
        assert_eq!(view.displayed_month(), Month::new(2024, 3));
    }

    #[test]
    fn test_controlled_pickers_request() {
        let (log, cb) = recorder();
        let mut view = ViewState::controlled(Month::new(2024, 2), Some(cb));
        view.pick_month(0);
        view.pick_year(2020);
        assert_eq!(*log.borrow(), vec![Month::new(2024, 0), Month::new(2020, 2)]);
        assert_eq!(view.displayed_month(), Month::new(2024, 2));
    }

    #[test]
    fn test_controlled_ignores_selected_date() {
        let mut view = ViewState::controlled(Month::new(2024, 2), None);
        assert!(!view.sync_selected_date(d(2024, 6, 1)));
        assert_eq!(view.displayed_month(), Month::new(2024, 2));
    }

    #[test]
    fn test_controlled_without_callback_drops_request() {
        let mut view = ViewState::controlled(Month::new(2024, 2), None);
        assert_eq!(view.prev_month(), ViewUpdate::Dropped(Month::new(2024, 1)));
        assert_eq!(view.displayed_month(), Month::new(2024, 2));
    }

    #[test]
    fn test_supply_on_uncontrolled_is_ignored() {
        let mut view = ViewState::uncontrolled(d(2024, 1, 15));
        assert!(!view.supply_view_month(Month::new(2030, 0)));
        assert_eq!(view.displayed_month(), Month::new(2024, 0));
        assert!(!view.is_controlled());
    }
}
