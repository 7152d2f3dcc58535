//! Reporting period model.
//!
//! This module contains the [`Period`] type: the inclusive pair of calendar-day
//! boundaries a report is computed for.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An inclusive range of calendar days used to select events for a report.
///
/// # Example
///
/// ```
/// use support_ledger::models::Period;
/// use chrono::NaiveDate;
///
/// let may = Period::month(2025, 5).unwrap();
/// assert_eq!(may.start_date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
/// assert_eq!(may.end_date, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
///
/// assert!(may.contains_date(NaiveDate::from_ymd_opt(2025, 5, 15).unwrap()));
/// assert!(!may.contains_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl Period {
    /// Creates a period from two boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] if `end_date` precedes `start_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidPeriod {
                message: format!("{} is after {}", start_date, end_date),
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The calendar month `month` (1-12) of `year`.
    pub fn month(year: i32, month: u32) -> EngineResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            EngineError::InvalidPeriod {
                message: format!("no such month {}-{:02}", year, month),
            }
        })?;
        let end = last_day_of_month(start).ok_or_else(|| EngineError::InvalidPeriod {
            message: format!("month {}-{:02} has no last day", year, month),
        })?;
        Self::new(start, end)
    }

    /// The calendar quarter `quarter` (1-4) of `year`.
    pub fn quarter(year: i32, quarter: u32) -> EngineResult<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(EngineError::InvalidPeriod {
                message: format!("no such quarter {} of {}", quarter, year),
            });
        }
        let first_month = (quarter - 1) * 3 + 1;
        let start = Self::month(year, first_month)?;
        let end = Self::month(year, first_month + 2)?;
        Self::new(start.start_date, end.end_date)
    }

    /// The whole calendar year.
    pub fn year(year: i32) -> EngineResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(EngineError::InvalidPeriod {
                message: format!("year {} is out of range", year),
            }),
        }
    }

    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterates every day of the period.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
