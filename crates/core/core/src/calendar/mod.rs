//! Calendar arithmetic: ISO weeks and week windows.
//!
//! All arithmetic runs on `chrono::NaiveDate`, a fixed proleptic calendar
//! with no time-of-day or timezone component, so daylight saving shifts can
//! never move a date by one.

mod bounds;
mod iso_week;

pub use bounds::{
    resolve_week, trend_span, week_bounds, WeekSelector, WeekWindow, MAX_TREND_WEEKS,
    MIN_TREND_WEEKS,
};
pub use iso_week::{iso_week, navigate_week, to_week_param, weeks_in_year, IsoWeek};
