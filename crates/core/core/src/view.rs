//! The weekly table as the dashboard renders it.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{summarize, WeekSummary};
use crate::calendar::{IsoWeek, WeekWindow};
use crate::format::format_date_range;
use crate::reconcile::{build_days, DayRange, DayRecord};
use crate::types::{BackfillRequest, SnapshotRow};

/// Everything the week page needs, computed from one immutable row set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    /// Canonical `YYYY-WNN` selector.
    pub param: String,
    pub iso_week: IsoWeek,
    pub window: WeekWindow,
    /// Human label such as `4 - 10 mrt 2024`.
    pub label: String,
    pub is_current_week: bool,
    pub previous_week: String,
    pub next_week: String,
    pub days: Vec<DayRecord>,
    pub summary: WeekSummary,
    /// Timed slots that could be backfilled.
    pub missing: Vec<BackfillRequest>,
}

/// Reconciles and summarizes one week.
pub fn build_week_view(
    window: WeekWindow,
    rows: &[SnapshotRow],
    today: NaiveDate,
    range: DayRange,
) -> WeekView {
    let days = build_days(window.start(), rows, today, range);
    let summary = summarize(&days);
    let missing = days.iter().flat_map(DayRecord::backfill_requests).collect();

    WeekView {
        param: window.to_param(),
        iso_week: window.iso_week(),
        window,
        label: format_date_range(window.span()),
        is_current_week: window.contains(today),
        previous_week: window.shifted(-1).to_param(),
        next_week: window.shifted(1).to_param(),
        days,
        summary,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricField, TimeSlot};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_view_navigation_and_label() {
        let window = WeekWindow::containing(date(2024, 12, 31));
        let view = build_week_view(window, &[], date(2025, 3, 1), DayRange::FullWeek);

        assert_eq!(view.param, "2025-W01");
        assert_eq!(view.previous_week, "2024-W52");
        assert_eq!(view.next_week, "2025-W02");
        assert_eq!(view.label, "30 dec - 5 jan 2025");
        assert!(!view.is_current_week);
        assert_eq!(view.missing.len(), 14);
    }

    #[test]
    fn test_week_view_current_week() {
        let monday = date(2024, 3, 4);
        let rows = vec![
            SnapshotRow::new(monday, TimeSlot::Morning, Utc::now())
                .with(MetricField::UnassignedTickets, 10),
            SnapshotRow::new(monday, TimeSlot::Evening, Utc::now())
                .with(MetricField::UnassignedTickets, 7),
        ];
        let view = build_week_view(
            WeekWindow::containing(monday),
            &rows,
            date(2024, 3, 5),
            DayRange::BusinessDays,
        );

        assert!(view.is_current_week);
        assert_eq!(view.days.len(), 5);
        assert_eq!(
            view.summary.snapshot_average(MetricField::UnassignedTickets),
            Some(8.5)
        );
        assert_eq!(
            view.missing,
            vec![
                BackfillRequest::new(date(2024, 3, 5), TimeSlot::Morning),
                BackfillRequest::new(date(2024, 3, 5), TimeSlot::Evening),
            ]
        );
    }
}
