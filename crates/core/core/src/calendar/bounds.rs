//! Week selector resolution.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::iso_week::{iso_week, IsoWeek};
use crate::error::{BoardError, BoardResult};
use crate::types::DateSpan;

/// Smallest and largest multi-week trend span.
pub const MIN_TREND_WEEKS: u32 = 1;
pub const MAX_TREND_WEEKS: u32 = 12;

/// Which week a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekSelector {
    /// The week containing the caller's local today.
    Current,
    /// An explicit `YYYY-WNN` week.
    Iso(IsoWeek),
}

impl FromStr for WeekSelector {
    type Err = BoardError;

    fn from_str(s: &str) -> BoardResult<Self> {
        if s == "current" {
            return Ok(WeekSelector::Current);
        }
        s.parse::<IsoWeek>().map(WeekSelector::Iso)
    }
}

impl fmt::Display for WeekSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekSelector::Current => f.write_str("current"),
            WeekSelector::Iso(week) => week.fmt(f),
        }
    }
}

/// A resolved Monday-to-Sunday week as a half-open 7-day interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "DateSpan", try_from = "DateSpan")]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let diff = if date.weekday() == Weekday::Sun {
            -6
        } else {
            1 - i64::from(date.weekday().number_from_monday())
        };
        Self {
            start: date + Duration::days(diff),
        }
    }

    /// The window of an explicit ISO week.
    pub fn for_iso_week(week: IsoWeek) -> BoardResult<Self> {
        Ok(Self {
            start: week.monday()?,
        })
    }

    /// The Monday starting the week.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The following Monday (exclusive).
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(7)
    }

    /// The window as a plain date span.
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start, self.end())
    }

    /// The ISO week this window covers.
    pub fn iso_week(&self) -> IsoWeek {
        iso_week(self.start)
    }

    /// The canonical `YYYY-WNN` selector for this window.
    pub fn to_param(&self) -> String {
        self.iso_week().to_string()
    }

    /// The window `weeks` weeks away.
    pub fn shifted(&self, weeks: i64) -> Self {
        Self {
            start: self.start + Duration::days(weeks * 7),
        }
    }

    /// Returns true when the date falls inside the week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.span().contains(date)
    }
}

impl From<WeekWindow> for DateSpan {
    fn from(window: WeekWindow) -> Self {
        window.span()
    }
}

impl TryFrom<DateSpan> for WeekWindow {
    type Error = BoardError;

    fn try_from(span: DateSpan) -> BoardResult<Self> {
        if span.start.weekday() != Weekday::Mon || span.len_days() != 7 {
            return Err(BoardError::invalid_date(format!(
                "{} - {} is not a Monday-based week",
                span.start, span.end
            )));
        }
        Ok(Self { start: span.start })
    }
}

/// Resolves a selector against the caller's local `today`.
pub fn week_bounds(selector: WeekSelector, today: NaiveDate) -> BoardResult<WeekWindow> {
    match selector {
        WeekSelector::Current => Ok(WeekWindow::containing(today)),
        WeekSelector::Iso(week) => WeekWindow::for_iso_week(week),
    }
}

/// Parses and resolves a raw selector string.
pub fn resolve_week(selector: &str, today: NaiveDate) -> BoardResult<WeekWindow> {
    week_bounds(selector.parse()?, today)
}

/// A multi-week span ending with the current week.
///
/// `weeks` is clamped to `[1, 12]`; the start moves back `(weeks - 1) * 7`
/// days from the current Monday.
pub fn trend_span(weeks: u32, today: NaiveDate) -> DateSpan {
    let weeks = weeks.clamp(MIN_TREND_WEEKS, MAX_TREND_WEEKS);
    let current = WeekWindow::containing(today);
    DateSpan::new(
        current.start() - Duration::days(i64::from(weeks - 1) * 7),
        current.end(),
    )
}
