//! Calendar classification.
//!
//! This module decides whether a calendar day is a working day or a rest day
//! (weekend or declared holiday), and reads calendar days out of the date
//! strings that arrive in raw records.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::HolidaySet;

/// The kind of calendar day for allowance purposes.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::DayKind;
///
/// assert!(DayKind::Weekend.is_rest());
/// assert!(DayKind::Holiday.is_rest());
/// assert!(!DayKind::Workday.is_rest());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Monday through Friday, not a declared holiday.
    Workday,
    /// Saturday or Sunday.
    Weekend,
    /// A declared holiday falling on a weekday.
    Holiday,
}

impl DayKind {
    /// Returns true for weekends and holidays.
    pub fn is_rest(self) -> bool {
        !matches!(self, DayKind::Workday)
    }
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Workday => write!(f, "Workday"),
            DayKind::Weekend => write!(f, "Weekend"),
            DayKind::Holiday => write!(f, "Holiday"),
        }
    }
}

/// Determines the [`DayKind`] of a calendar day.
///
/// A weekend day that is also a declared holiday reports as [`DayKind::Weekend`];
/// both are rest days so the distinction never changes pay.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::{get_day_kind, DayKind};
/// use support_ledger::models::HolidaySet;
/// use chrono::NaiveDate;
///
/// let holidays: HolidaySet = [NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()]
///     .into_iter()
///     .collect();
///
/// // 2025-05-05 is a Monday and a declared holiday
/// let monday = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
/// assert_eq!(get_day_kind(monday, &holidays), DayKind::Holiday);
///
/// // 2025-05-10 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
/// assert_eq!(get_day_kind(saturday, &holidays), DayKind::Weekend);
/// ```
pub fn get_day_kind(date: NaiveDate, holidays: &HolidaySet) -> DayKind {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayKind::Weekend,
        _ if holidays.contains(date) => DayKind::Holiday,
        _ => DayKind::Workday,
    }
}

/// Returns true iff the date is a Saturday, a Sunday, or a declared holiday.
pub fn is_rest_day(date: NaiveDate, holidays: &HolidaySet) -> bool {
    get_day_kind(date, holidays).is_rest()
}

/// Reads a calendar day from a raw date string.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339 timestamps; for
/// timestamps the time of day is discarded (an RFC 3339 value keeps the date
/// as written in its own offset).
///
/// # Errors
///
/// Returns [`EngineError::MalformedDate`] naming `field` when nothing matches.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::parse_calendar_day;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 5, 13).unwrap();
/// assert_eq!(parse_calendar_day("date", "2025-05-13").unwrap(), expected);
/// assert_eq!(parse_calendar_day("date", "2025-05-13T09:30:00").unwrap(), expected);
/// assert_eq!(parse_calendar_day("date", "2025-05-13T23:30:00+09:00").unwrap(), expected);
/// assert!(parse_calendar_day("date", "13/05/2025").is_err());
/// ```
pub fn parse_calendar_day(field: &str, value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }

    Err(EngineError::MalformedDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}
