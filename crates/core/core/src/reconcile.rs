//! Maps sparse `(date, slot)` rows onto a fixed calendar grid.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::types::{BackfillRequest, DateSpan, SnapshotRow, TimeSlot};

/// Dutch weekday names, Monday first.
pub const DAY_NAMES: [&str; 7] = [
    "Maandag", "Dinsdag", "Woensdag", "Donderdag", "Vrijdag", "Zaterdag", "Zondag",
];

/// How many days of a week the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayRange {
    /// Monday through Sunday.
    #[default]
    FullWeek,
    /// Monday through Friday.
    BusinessDays,
}

impl DayRange {
    /// Number of days in the range.
    pub fn len(&self) -> usize {
        match self {
            DayRange::FullWeek => 7,
            DayRange::BusinessDays => 5,
        }
    }
}

/// One calendar day with the snapshots collected on it.
///
/// Holds at most one row per slot tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub is_today: bool,
    pub is_future: bool,
    pub morning: Option<SnapshotRow>,
    pub evening: Option<SnapshotRow>,
    pub latest: Option<SnapshotRow>,
}

impl DayRecord {
    /// The row collected in a given slot.
    pub fn slot(&self, slot: TimeSlot) -> Option<&SnapshotRow> {
        match slot {
            TimeSlot::Morning => self.morning.as_ref(),
            TimeSlot::Evening => self.evening.as_ref(),
            TimeSlot::Latest => self.latest.as_ref(),
        }
    }

    /// Returns true when any slot has a row.
    pub fn has_data(&self) -> bool {
        self.morning.is_some() || self.evening.is_some() || self.latest.is_some()
    }

    /// Timed slots with no row on a day that is not in the future.
    pub fn missing_slots(&self) -> Vec<TimeSlot> {
        if self.is_future {
            return Vec::new();
        }
        TimeSlot::TIMED
            .into_iter()
            .filter(|slot| self.slot(*slot).is_none())
            .collect()
    }

    /// Backfill requests for every missing timed slot.
    pub fn backfill_requests(&self) -> Vec<BackfillRequest> {
        self.missing_slots()
            .into_iter()
            .map(|slot| BackfillRequest::new(self.date, slot))
            .collect()
    }
}

/// Builds one record per day of the week starting at `week_start`.
///
/// Rows outside the week are ignored. When the store hands over two rows
/// for the same key the first one wins.
pub fn build_days(
    week_start: NaiveDate,
    rows: &[SnapshotRow],
    today: NaiveDate,
    range: DayRange,
) -> Vec<DayRecord> {
    let index = index_rows(rows);
    (0..range.len())
        .map(|offset| {
            let date = week_start + Duration::days(offset as i64);
            day_record(date, DAY_NAMES[offset], &index, today)
        })
        .collect()
}

/// Builds one record per day of an arbitrary span (trend views).
pub fn build_span_days(span: DateSpan, rows: &[SnapshotRow], today: NaiveDate) -> Vec<DayRecord> {
    let index = index_rows(rows);
    span.days()
        .map(|date| {
            let name = DAY_NAMES[date.weekday().num_days_from_monday() as usize];
            day_record(date, name, &index, today)
        })
        .collect()
}

fn index_rows(rows: &[SnapshotRow]) -> HashMap<(NaiveDate, TimeSlot), &SnapshotRow> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(row.key()).or_insert(row);
    }
    index
}

fn day_record(
    date: NaiveDate,
    day_name: &'static str,
    index: &HashMap<(NaiveDate, TimeSlot), &SnapshotRow>,
    today: NaiveDate,
) -> DayRecord {
    let find = |slot: TimeSlot| index.get(&(date, slot)).map(|row| (*row).clone());
    DayRecord {
        date,
        day_name,
        is_today: date == today,
        is_future: date > today,
        morning: find(TimeSlot::Morning),
        evening: find(TimeSlot::Evening),
        latest: find(TimeSlot::Latest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricField;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(d: NaiveDate, slot: TimeSlot) -> SnapshotRow {
        SnapshotRow::new(d, slot, Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_slots_land_on_their_own_day_and_tag() {
        let monday = date(2024, 3, 4);
        let rows = vec![
            row(monday, TimeSlot::Morning).with(MetricField::UnassignedTickets, 10),
            row(monday, TimeSlot::Evening).with(MetricField::UnassignedTickets, 7),
            row(date(2024, 3, 6), TimeSlot::Latest).with(MetricField::TotalCalls, 30),
        ];
        let days = build_days(monday, &rows, date(2024, 3, 6), DayRange::FullWeek);

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day_name, "Maandag");
        assert_eq!(days[6].day_name, "Zondag");
        assert_eq!(days[0].morning.as_ref().unwrap().unassigned_tickets, Some(10));
        assert_eq!(days[0].evening.as_ref().unwrap().unassigned_tickets, Some(7));
        assert!(days[0].latest.is_none());
        assert_eq!(days[2].latest.as_ref().unwrap().total_calls, Some(30));
        assert!(!days[1].has_data());
    }

    #[test]
    fn test_evening_row_never_becomes_morning() {
        let monday = date(2024, 3, 4);
        let rows = vec![row(monday, TimeSlot::Evening).with(MetricField::AllOpenTickets, 3)];
        let days = build_days(monday, &rows, monday, DayRange::FullWeek);
        assert!(days[0].morning.is_none());
        assert!(days[0].evening.is_some());
    }

    #[test]
    fn test_today_and_future_flags() {
        let monday = date(2024, 3, 4);
        let days = build_days(monday, &[], date(2024, 3, 6), DayRange::BusinessDays);
        assert_eq!(days.len(), 5);
        let flags: Vec<(bool, bool)> = days.iter().map(|d| (d.is_today, d.is_future)).collect();
        assert_eq!(
            flags,
            vec![(false, false), (false, false), (true, false), (false, true), (false, true)]
        );
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let monday = date(2024, 3, 4);
        let rows = vec![
            row(date(2024, 3, 5), TimeSlot::Morning).with(MetricField::WaitingOnUs, 4),
            row(monday, TimeSlot::Latest).with(MetricField::RevenueDaily, 1200),
            row(date(2024, 3, 12), TimeSlot::Morning).with(MetricField::WaitingOnUs, 9),
        ];
        let a = build_days(monday, &rows, date(2024, 3, 8), DayRange::FullWeek);
        let b = build_days(monday, &rows, date(2024, 3, 8), DayRange::FullWeek);
        assert_eq!(a, b);
        assert!(a.iter().all(|d| d.date < date(2024, 3, 11)));
    }

    #[test]
    fn test_duplicate_key_keeps_first_row() {
        let monday = date(2024, 3, 4);
        let rows = vec![
            row(monday, TimeSlot::Morning).with(MetricField::AllOpenTickets, 1),
            row(monday, TimeSlot::Morning).with(MetricField::AllOpenTickets, 2),
        ];
        let days = build_days(monday, &rows, monday, DayRange::FullWeek);
        assert_eq!(days[0].morning.as_ref().unwrap().all_open_tickets, Some(1));
    }

    #[test]
    fn test_missing_slots_skip_future_days() {
        let monday = date(2024, 3, 4);
        let rows = vec![row(monday, TimeSlot::Morning)];
        let days = build_days(monday, &rows, monday, DayRange::FullWeek);
        assert_eq!(days[0].missing_slots(), vec![TimeSlot::Evening]);
        assert!(days[1].missing_slots().is_empty());
        assert_eq!(
            days[0].backfill_requests(),
            vec![BackfillRequest::new(monday, TimeSlot::Evening)]
        );
    }

    #[test]
    fn test_span_days_use_weekday_names() {
        let span = DateSpan::new(date(2024, 3, 9), date(2024, 3, 12));
        let days = build_span_days(span, &[], date(2024, 3, 20));
        let names: Vec<&str> = days.iter().map(|d| d.day_name).collect();
        assert_eq!(names, vec!["Zaterdag", "Zondag", "Maandag"]);
    }
}
