//! # Weekboard Core
//!
//! This crate provides the calendar and reconciliation logic behind the
//! weekly metrics dashboard. It maps sparse `(date, slot)` snapshot rows onto
//! a Monday-to-Sunday grid, derives daily values under explicit fallback
//! policies and summarizes weeks, including month-boundary-aware revenue
//! growth. It also defines the store and backfill traits that adapters
//! implement, and the async [`MetricsService`] that ties them together.
//!
//! Everything except [`MetricsService`] is pure and evaluated against an
//! explicit local "today" supplied by a [`ReferenceClock`].

pub mod aggregate;
pub mod calendar;
pub mod clock;
pub mod daily;
pub mod error;
pub mod format;
pub mod patch;
pub mod reconcile;
pub mod service;
pub mod traits;
pub mod trends;
pub mod types;
pub mod version;
pub mod view;

// Re-export commonly used items at the crate root
pub use aggregate::{summarize, WeekSummary};
pub use calendar::{
    iso_week, navigate_week, resolve_week, to_week_param, trend_span, week_bounds, IsoWeek,
    WeekSelector, WeekWindow,
};
pub use clock::{to_local_wall_clock, FixedClock, ReferenceClock, SystemClock, WallClock};
pub use daily::{daily_value, DailyField, FallbackPolicy, SlotDelta};
pub use error::{BoardError, BoardResult};
pub use patch::{FieldUpdate, SnapshotUpsert};
pub use reconcile::{build_days, build_span_days, DayRange, DayRecord};
pub use service::MetricsService;
pub use traits::{BackfillTrigger, MetricsStore};
pub use trends::{build_trends, TrendReport};
pub use types::{BackfillRequest, DateSpan, FieldKind, MetricField, SnapshotRow, TimeSlot};
pub use version::VersionWatcher;
pub use view::{build_week_view, WeekView};
