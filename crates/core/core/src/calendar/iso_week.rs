//! ISO-8601 week numbering.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BoardError, BoardResult};

/// An ISO week: the year containing the week's Thursday and its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IsoWeek {
    pub year: i32,
    pub week: u32,
}

impl IsoWeek {
    /// Returns the Monday that starts this week.
    ///
    /// Week 1 is the week containing January 4th.
    pub fn monday(&self) -> BoardResult<NaiveDate> {
        let jan4 = NaiveDate::from_ymd_opt(self.year, 1, 4)
            .ok_or_else(|| BoardError::invalid_week(self.to_string()))?;
        let jan4_weekday = i64::from(jan4.weekday().number_from_monday());
        let week1_monday = jan4 - Duration::days(jan4_weekday - 1);
        Ok(week1_monday + Duration::days((i64::from(self.week) - 1) * 7))
    }

    /// Returns the week `offset` weeks away, renumbered canonically.
    pub fn shifted(&self, offset: i64) -> BoardResult<IsoWeek> {
        Ok(iso_week(self.monday()? + Duration::days(offset * 7)))
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for IsoWeek {
    type Err = BoardError;

    /// Parses exactly `^\d{4}-W\d{2}$`; week 00 and weeks above 53 are refused.
    fn from_str(s: &str) -> BoardResult<Self> {
        let bytes = s.as_bytes();
        let shape_ok = bytes.len() == 8
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5] == b'W'
            && bytes[6..].iter().all(u8::is_ascii_digit);
        if !shape_ok {
            return Err(BoardError::invalid_week(s));
        }

        let year: i32 = s[..4].parse().map_err(|_| BoardError::invalid_week(s))?;
        let week: u32 = s[6..].parse().map_err(|_| BoardError::invalid_week(s))?;
        if !(1..=53).contains(&week) {
            return Err(BoardError::invalid_week(s));
        }
        Ok(IsoWeek { year, week })
    }
}

/// Returns the ISO year and week number of a date.
///
/// The week belongs to the year holding its Thursday, so dates close to
/// New Year can land in week 52/53 of the previous year or week 1 of the
/// next one.
pub fn iso_week(date: NaiveDate) -> IsoWeek {
    let dow = i64::from(date.weekday().number_from_monday());
    let thursday = date + Duration::days(4 - dow);
    // ceil((days since Jan 1 + 1) / 7)
    let week = thursday.ordinal0() / 7 + 1;
    IsoWeek {
        year: thursday.year(),
        week,
    }
}

/// Formats the week containing `date` as a `YYYY-WNN` selector.
pub fn to_week_param(date: NaiveDate) -> String {
    iso_week(date).to_string()
}

/// Moves a week selector one week back (`-1`) or forward (`1`) from its Monday.
pub fn navigate_week(monday: NaiveDate, direction: i64) -> String {
    to_week_param(monday + Duration::days(direction * 7))
}

/// Number of ISO weeks in a year (52 or 53).
pub fn weeks_in_year(year: i32) -> u32 {
    // December 28th always falls in the last week of its ISO year.
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| iso_week(d).week)
        .unwrap_or(52)
}
