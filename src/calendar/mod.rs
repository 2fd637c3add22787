//! Month grids, mood heatmap colors and month-over-month session statistics.
//!
//! Everything here is pure: callers pass `today`/`now` and the records they
//! fetched, and get back fresh values on every call.

pub mod grid;
pub mod overlay;
pub mod stats;

pub use grid::{month_grid, month_window, MonthGrid, DEFAULT_WINDOW_MONTHS};
pub use overlay::{mood_color, mood_map, overlay, Cell, Theme};
pub use stats::{monthly_stats, period_stats, sport_stats, MonthlyStats, PeriodStats, SportStats};
