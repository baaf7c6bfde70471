use chrono::NaiveDate;
use smartcal::widget::{render_lines, CALENDAR_HEIGHT, CALENDAR_WIDTH};
use smartcal::{compute_grid, Calendar, CalendarProps, Month, ViewState, ViewUpdate};
use std::cell::RefCell;
use std::rc::Rc;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn every_month_of_a_four_century_cycle_has_a_well_formed_grid() {
    for year in 2000..2400 {
        for index in 0..12 {
            let month = Month::new(year, index);
            let grid  = compute_grid(month);
            let cells = grid.cells();

            assert_eq!(cells.len(), 42);
            assert!(cells.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
            assert_eq!(grid.current_month_run().len() as u32, month.days());
            assert_eq!(grid.leading_days() as u32, month.first_weekday());
            assert_eq!(grid.leading_days() + grid.current_month_run().len() + grid.trailing_days(), 42);
        }
    }
}

#[test]
fn uncontrolled_calendar_follows_host_selection() {
    let mut cal = Calendar::new(CalendarProps::new(d(2024, 1, 15)));
    assert_eq!(cal.displayed_month(), Month::new(2024, 0));

    cal.set_date(d(2024, 6, 1));
    assert_eq!(cal.displayed_month(), Month::new(2024, 5));
    assert_eq!(cal.grid().selected_cell().map(|c| c.iso_date()), Some("2024-06-01".to_owned()));
}

#[test]
fn controlled_calendar_only_requests_changes() {
    let requests = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&requests);
    let mut cal = Calendar::new(
        CalendarProps::new(d(2024, 3, 10))
            .today(d(2024, 3, 10))
            .view_date(Month::new(2024, 2))
            .on_view_change(move |m| sink.borrow_mut().push(m)),
    );
    let march = render_lines(&cal, CALENDAR_WIDTH, CALENDAR_HEIGHT);

    cal.next_month();
    assert_eq!(*requests.borrow(), vec![Month::new(2024, 3)]);
    assert_eq!(render_lines(&cal, CALENDAR_WIDTH, CALENDAR_HEIGHT), march);

    cal.set_view_date(Month::new(2024, 3));
    assert_eq!(cal.displayed_month(), Month::new(2024, 3));
    assert_ne!(render_lines(&cal, CALENDAR_WIDTH, CALENDAR_HEIGHT), march);
}

#[test]
fn year_boundaries_wrap_in_both_directions() {
    let mut view = ViewState::uncontrolled(d(2024, 1, 1));
    assert_eq!(view.prev_month(), ViewUpdate::Moved(Month::new(2023, 11)));
    assert_eq!(view.next_month(), ViewUpdate::Moved(Month::new(2024, 0)));

    let mut view = ViewState::uncontrolled(d(2023, 12, 31));
    assert_eq!(view.next_month(), ViewUpdate::Moved(Month::new(2024, 0)));
}

#[test]
fn december_31_selection_renders_in_december() {
    let cal = Calendar::new(CalendarProps::new(d(2023, 12, 31)).today(d(2023, 12, 31)));
    let lines = render_lines(&cal, CALENDAR_WIDTH, CALENDAR_HEIGHT);
    assert!(lines[1].contains("December 2023"));

    let grid = cal.grid();
    let selected = grid.selected_cell().unwrap();
    assert_eq!(selected.day(), 31);
    assert!(selected.in_current_month);
    assert!(selected.is_today);
}
