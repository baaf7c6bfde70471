//! A month-calendar widget for ratatui.
//!
//! [`calendar`] holds the pure grid arithmetic, [`view`] the displayed-month
//! state machine (owned by the widget or by its host) and [`widget`] the
//! ratatui rendering and input handling built on both.

pub mod calendar;
pub mod config;
pub mod styles;
pub mod theme;
pub mod view;
pub mod widget;

#[cfg(test)]
mod testing;

pub use calendar::{compute_grid, compute_grid_with, CalendarGrid, GridCell, Month, WeekStart};
pub use view::{ViewOwnership, ViewState, ViewUpdate};
pub use widget::{Calendar, CalendarLayout, CalendarProps, CellRegion};
