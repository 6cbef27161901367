//! Async façade tying the pure core to its collaborators.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::calendar::{resolve_week, trend_span, WeekWindow};
use crate::clock::{ReferenceClock, SystemClock};
use crate::error::BoardResult;
use crate::patch::SnapshotUpsert;
use crate::reconcile::DayRange;
use crate::traits::{BackfillTrigger, MetricsStore};
use crate::trends::{build_trends, TrendReport};
use crate::types::{BackfillRequest, DateSpan, SnapshotRow};
use crate::view::{build_week_view, WeekView};

/// Serves dashboard queries from a metrics store.
///
/// Every call fetches rows and recomputes from scratch; nothing is cached.
/// A failed fetch is returned as an error and the pure core never runs on
/// partial data.
#[derive(Clone)]
pub struct MetricsService {
    store: Arc<dyn MetricsStore>,
    backfill: Arc<dyn BackfillTrigger>,
    clock: Arc<dyn ReferenceClock>,
    day_range: DayRange,
}

impl MetricsService {
    /// Creates a service reading the system clock.
    pub fn new(store: Arc<dyn MetricsStore>, backfill: Arc<dyn BackfillTrigger>) -> Self {
        Self {
            store,
            backfill,
            clock: Arc::new(SystemClock),
            day_range: DayRange::default(),
        }
    }

    /// Replaces the reference clock.
    pub fn with_clock(mut self, clock: Arc<dyn ReferenceClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets how many days of each week the table shows.
    pub fn with_day_range(mut self, range: DayRange) -> Self {
        self.day_range = range;
        self
    }

    /// The caller's local date.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The reference instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn day_range(&self) -> DayRange {
        self.day_range
    }

    /// Resolves a week selector and fetches its rows.
    pub async fn week_rows(&self, selector: &str) -> BoardResult<(WeekWindow, Vec<SnapshotRow>)> {
        self.fetch_week(selector, self.today()).await
    }

    /// Fetches the rows of a trend span of `weeks` weeks (clamped to 1..=12).
    pub async fn span_rows(&self, weeks: u32) -> BoardResult<(DateSpan, Vec<SnapshotRow>)> {
        self.fetch_span(weeks, self.today()).await
    }

    /// Builds the week table for a selector.
    pub async fn week_view(&self, selector: &str) -> BoardResult<WeekView> {
        let today = self.today();
        let (window, rows) = self.fetch_week(selector, today).await?;
        Ok(build_week_view(window, &rows, today, self.day_range))
    }

    /// Builds the chart series for the last `weeks` weeks.
    pub async fn trends(&self, weeks: u32) -> BoardResult<TrendReport> {
        let today = self.today();
        let (span, rows) = self.fetch_span(weeks, today).await?;
        Ok(build_trends(span, &rows, today))
    }

    async fn fetch_week(&self, selector: &str, today: NaiveDate) -> BoardResult<(WeekWindow, Vec<SnapshotRow>)> {
        let window = resolve_week(selector, today)?;
        let rows = self.store.rows_between(window.span()).await?;
        debug!(week = %window.to_param(), rows = rows.len(), "fetched week rows");
        Ok((window, rows))
    }

    async fn fetch_span(&self, weeks: u32, today: NaiveDate) -> BoardResult<(DateSpan, Vec<SnapshotRow>)> {
        let span = trend_span(weeks, today);
        let rows = self.store.rows_between(span).await?;
        debug!(start = %span.start, end = %span.end, rows = rows.len(), "fetched span rows");
        Ok((span, rows))
    }

    /// Validates and stores a collector write, stamping the reference instant.
    pub async fn ingest(&self, patch: &SnapshotUpsert) -> BoardResult<SnapshotRow> {
        patch.validate()?;
        let row = self.store.upsert(patch, self.now()).await?;
        info!(
            date = %patch.metric_date,
            slot = %patch.time_slot,
            fields = patch.fields.len(),
            "ingested snapshot"
        );
        Ok(row)
    }

    /// The newest `collected_at` in the store.
    pub async fn data_version(&self) -> BoardResult<Option<DateTime<Utc>>> {
        self.store.data_version().await
    }

    /// Asks the collector to fill a missing timed slot.
    pub async fn backfill(&self, request: &BackfillRequest) -> BoardResult<()> {
        request.validate()?;
        self.backfill.trigger(request).await?;
        info!(date = %request.date, slot = %request.time_slot, "backfill triggered");
        Ok(())
    }
}

impl std::fmt::Debug for MetricsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsService")
            .field("day_range", &self.day_range)
            .finish_non_exhaustive()
    }
}
