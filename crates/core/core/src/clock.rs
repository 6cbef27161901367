//! Central European (Summer) Time without a timezone database.
//!
//! EU rule: clocks go forward on the last Sunday of March at 01:00 UTC and
//! back on the last Sunday of October at 01:00 UTC. Inside that window the
//! offset is +2h, outside it +1h.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hour and minute on the local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallClock {
    pub hour: u32,
    pub minute: u32,
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The last Sunday of a month.
pub fn last_sunday_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last_day = first_of_next - Duration::days(1);
    Some(last_day - Duration::days(i64::from(last_day.weekday().num_days_from_sunday())))
}

/// The `[start, end)` summer time window of a year, in UTC.
pub fn summer_time_window(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = last_sunday_of_month(year, 3)?.and_hms_opt(1, 0, 0)?.and_utc();
    let end = last_sunday_of_month(year, 10)?.and_hms_opt(1, 0, 0)?.and_utc();
    Some((start, end))
}

/// Returns true when CEST applies at the instant.
pub fn is_summer_time(instant: DateTime<Utc>) -> bool {
    summer_time_window(instant.year())
        .map(|(start, end)| start <= instant && instant < end)
        .unwrap_or(false)
}

/// The local offset from UTC in hours (1 or 2).
pub fn utc_offset_hours(instant: DateTime<Utc>) -> i64 {
    if is_summer_time(instant) { 2 } else { 1 }
}

/// Converts an instant to the local wall clock; display only.
pub fn to_local_wall_clock(instant: DateTime<Utc>) -> WallClock {
    let hour = (instant.hour() as i64 + utc_offset_hours(instant)).rem_euclid(24) as u32;
    WallClock {
        hour,
        minute: instant.minute(),
    }
}

/// Converts an instant to a local date and time, rolling the date over.
pub fn to_local_datetime(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc() + Duration::hours(utc_offset_hours(instant))
}

/// The local calendar date at the instant.
pub fn local_today(instant: DateTime<Utc>) -> NaiveDate {
    to_local_datetime(instant).date()
}

/// Source of the reference instant that pure code is evaluated against.
pub trait ReferenceClock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The local date at the current instant.
    fn today(&self) -> NaiveDate {
        local_today(self.now())
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ReferenceClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl ReferenceClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_summer_and_winter_offsets() {
        assert_eq!(to_local_wall_clock(utc(2024, 6, 15, 10, 0)), WallClock { hour: 12, minute: 0 });
        assert_eq!(to_local_wall_clock(utc(2024, 1, 15, 10, 0)), WallClock { hour: 11, minute: 0 });
    }

    #[test]
    fn test_last_sundays() {
        assert_eq!(last_sunday_of_month(2024, 3), NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(last_sunday_of_month(2024, 10), NaiveDate::from_ymd_opt(2024, 10, 27));
        assert_eq!(last_sunday_of_month(2025, 3), NaiveDate::from_ymd_opt(2025, 3, 30));
        assert_eq!(last_sunday_of_month(2025, 10), NaiveDate::from_ymd_opt(2025, 10, 26));
        for year in 2000..2040 {
            for month in [3, 10] {
                let d = last_sunday_of_month(year, month).unwrap();
                assert!(d.day() >= 25, "{d}");
                assert_eq!(d.weekday(), chrono::Weekday::Sun);
            }
        }
    }

    #[test]
    fn test_transition_instants() {
        // 2024-03-31 01:00 UTC: clocks jump from 02:00 CET to 03:00 CEST.
        assert!(!is_summer_time(utc(2024, 3, 31, 0, 59)));
        assert!(is_summer_time(utc(2024, 3, 31, 1, 0)));
        assert_eq!(to_local_wall_clock(utc(2024, 3, 31, 1, 0)).hour, 3);

        // 2024-10-27 01:00 UTC: back from 03:00 CEST to 02:00 CET.
        assert!(is_summer_time(utc(2024, 10, 27, 0, 59)));
        assert!(!is_summer_time(utc(2024, 10, 27, 1, 0)));
        assert_eq!(to_local_wall_clock(utc(2024, 10, 27, 1, 0)).hour, 2);
    }

    #[test]
    fn test_hour_wraps_around() {
        let clock = to_local_wall_clock(utc(2024, 7, 1, 23, 30));
        assert_eq!(clock, WallClock { hour: 1, minute: 30 });
        assert_eq!(clock.to_string(), "01:30");
    }

    #[test]
    fn test_local_today_rolls_over_midnight() {
        // 23:30 UTC on a winter Sunday is already Monday in Amsterdam.
        let instant = utc(2024, 3, 3, 23, 30);
        assert_eq!(local_today(instant), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(FixedClock(instant).today(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }
}
