//! Declared holiday calendar.
//!
//! This module contains the [`HolidaySet`] type: the collection of calendar
//! days flagged as non-working regardless of weekday.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A read-only set of declared holidays.
///
/// Serializes as a sorted list of ISO calendar days.
///
/// # Example
///
/// ```
/// use support_ledger::models::HolidaySet;
/// use chrono::NaiveDate;
///
/// let holidays: HolidaySet = [NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()]
///     .into_iter()
///     .collect();
///
/// assert!(holidays.contains(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()));
/// assert!(!holidays.contains(NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    /// Creates an empty holiday set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the calendar day is a declared holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Adds a holiday. Returns false if it was already present.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    /// Number of declared holidays.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if no holidays are declared.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates the holidays in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl Extend<NaiveDate> for HolidaySet {
    fn extend<I: IntoIterator<Item = NaiveDate>>(&mut self, iter: I) {
        self.dates.extend(iter);
    }
}
