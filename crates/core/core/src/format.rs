//! Display formatting for the dashboard (nl-NL conventions).

use chrono::{Datelike, Duration, NaiveDate};

use crate::types::DateSpan;

/// Dutch month abbreviations, January first.
pub const MONTHS_NL: [&str; 12] = [
    "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

/// Placeholder for a figure with no data.
pub const NO_DATA: &str = "—";

/// Rounds minor currency units to whole major units, half away from zero.
pub fn round_minor_units(cents: i64) -> i64 {
    let whole = (cents.unsigned_abs() + 50) / 100;
    let whole = i64::try_from(whole).unwrap_or(i64::MAX);
    if cents < 0 { -whole } else { whole }
}

/// Groups the digits of a non-negative number in threes with `.`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Formats cents as whole euros, e.g. `€1.235` or `-€1.235`.
///
/// The sign is a prefix and never shows on a value that rounds to zero.
pub fn format_currency(cents: i64) -> String {
    let whole = round_minor_units(cents);
    let sign = if whole < 0 { "-" } else { "" };
    format!("{sign}€{}", group_thousands(whole.unsigned_abs()))
}

/// Like [`format_currency`] but with an explicit `+` on gains.
pub fn format_growth(cents: Option<i64>) -> String {
    match cents {
        None => NO_DATA.to_string(),
        Some(cents) if round_minor_units(cents) > 0 => format!("+{}", format_currency(cents)),
        Some(cents) => format_currency(cents),
    }
}

/// Signed count with `.` grouping, e.g. `+12` or `-1.024`.
pub fn format_count_growth(value: Option<i64>) -> String {
    match value {
        None => NO_DATA.to_string(),
        Some(v) if v > 0 => format!("+{}", group_thousands(v.unsigned_abs())),
        Some(v) if v < 0 => format!("-{}", group_thousands(v.unsigned_abs())),
        Some(_) => "0".to_string(),
    }
}

/// An average to one decimal, or `—`.
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}"),
        _ => NO_DATA.to_string(),
    }
}

/// A label for a half-open span such as `4 - 10 mrt 2024`.
///
/// The month is repeated only when the span crosses one:
/// `26 feb - 3 mrt 2024`. The year is that of the last day.
pub fn format_date_range(span: DateSpan) -> String {
    let start = span.start;
    let last = span.end - Duration::days(1);
    let start_month = month_name(start);
    let end_month = month_name(last);
    if start.month() == last.month() {
        format!("{} - {} {} {}", start.day(), last.day(), end_month, last.year())
    } else {
        format!(
            "{} {} - {} {} {}",
            start.day(),
            start_month,
            last.day(),
            end_month,
            last.year()
        )
    }
}

/// Chart tick label `d/m`.
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}", date.day(), date.month())
}

fn month_name(date: NaiveDate) -> &'static str {
    MONTHS_NL[date.month0() as usize]
}
