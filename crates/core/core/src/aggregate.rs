//! Week-level summaries over reconciled days.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::daily::{daily_value, DailyField};
use crate::reconcile::DayRecord;
use crate::types::{FieldKind, MetricField};

/// Aggregates for one reconciled week (or any run of days).
///
/// Days flagged as future are skipped everywhere. A `None` average or
/// growth figure means "no data", never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    /// Days that were considered (not in the future).
    pub days_considered: usize,
    /// Days with at least one row.
    pub days_with_data: usize,
    /// Totals-policy fields summed over the days; absent counts as 0.
    /// Sums saturate at the `i64` bounds.
    pub totals: BTreeMap<MetricField, i64>,
    /// Totals-policy fields averaged over the days that have a value.
    pub daily_averages: BTreeMap<MetricField, Option<f64>>,
    /// Snapshot fields averaged over every 08:00 and 18:00 reading.
    pub snapshot_averages: BTreeMap<MetricField, Option<f64>>,
    /// Sum of `revenue_daily`; suppressed when the data spans two months.
    pub revenue_growth: Option<i64>,
    /// Signed sum of `subscriptions_new` over the days that have it.
    pub subscriptions_growth: Option<i64>,
    /// Last known month-to-date revenue.
    pub revenue_mtd: Option<i64>,
    /// Last known active subscription count.
    pub subscriptions_active: Option<i64>,
}

impl WeekSummary {
    /// Sum of a totals-policy field (0 for unknown fields).
    pub fn total(&self, field: MetricField) -> i64 {
        self.totals.get(&field).copied().unwrap_or(0)
    }

    /// Per-day average of a totals-policy field.
    pub fn daily_average(&self, field: MetricField) -> Option<f64> {
        self.daily_averages.get(&field).copied().flatten()
    }

    /// Average reading of a snapshot field.
    pub fn snapshot_average(&self, field: MetricField) -> Option<f64> {
        self.snapshot_averages.get(&field).copied().flatten()
    }
}

/// Computes the week summary.
pub fn summarize(days: &[DayRecord]) -> WeekSummary {
    let considered: Vec<&DayRecord> = days.iter().filter(|d| !d.is_future).collect();

    let mut totals = BTreeMap::new();
    let mut daily_averages = BTreeMap::new();
    for field in DailyField::TOTALS {
        let values: Vec<i64> = considered
            .iter()
            .filter_map(|day| daily_value(day, field))
            .collect();
        totals.insert(field.field(), saturating_sum(values.iter().copied()));
        daily_averages.insert(field.field(), mean(&values));
    }

    let snapshot_averages = MetricField::of_kind(FieldKind::Snapshot)
        .map(|field| {
            let readings: Vec<i64> = considered
                .iter()
                .flat_map(|day| [day.morning.as_ref(), day.evening.as_ref()])
                .flatten()
                .filter_map(|row| row.get(field))
                .collect();
            (field, mean(&readings))
        })
        .collect();

    WeekSummary {
        days_considered: considered.len(),
        days_with_data: considered.iter().filter(|d| d.has_data()).count(),
        totals,
        daily_averages,
        snapshot_averages,
        revenue_growth: revenue_growth(&considered),
        subscriptions_growth: signed_sum(&considered, DailyField::SUBSCRIPTIONS_NEW),
        revenue_mtd: last_known(&considered, DailyField::REVENUE_MTD),
        subscriptions_active: last_known(&considered, DailyField::SUBSCRIPTIONS_ACTIVE),
    }
}

/// Arithmetic mean; an empty input has no mean.
pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    Some(sum / values.len() as f64)
}

/// Sums without wrapping; clamps at `i64::MIN`/`i64::MAX`.
fn saturating_sum(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

/// Sums `revenue_daily` unless the first and last day with data fall in
/// different calendar months.
pub fn revenue_growth(days: &[&DayRecord]) -> Option<i64> {
    let points = dated_values(days, DailyField::REVENUE_DAILY);
    let (first, _) = points.first()?;
    let (last, _) = points.last()?;
    if (first.year(), first.month()) != (last.year(), last.month()) {
        return None;
    }
    Some(saturating_sum(points.iter().map(|(_, v)| *v)))
}

fn signed_sum(days: &[&DayRecord], field: DailyField) -> Option<i64> {
    let points = dated_values(days, field);
    if points.is_empty() {
        return None;
    }
    Some(saturating_sum(points.iter().map(|(_, v)| *v)))
}

fn last_known(days: &[&DayRecord], field: DailyField) -> Option<i64> {
    dated_values(days, field).last().map(|(_, v)| *v)
}

fn dated_values(days: &[&DayRecord], field: DailyField) -> Vec<(NaiveDate, i64)> {
    days.iter()
        .filter_map(|day| daily_value(day, field).map(|v| (day.date, v)))
        .collect()
}
