//! Date-range compression and coverage classification.
//!
//! This module turns a sparse set of support days into closed intervals of
//! consecutive days, and decides whether a coverage set spans an event
//! exactly ("full coverage") or only part of it.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DateRange, RangeGroup, ranges_label};

/// Groups consecutive days into closed, ascending intervals.
///
/// Input may be unordered and may contain duplicates; it is deduplicated and
/// sorted before a single linear pass. Adjacent output ranges are always
/// separated by at least one missing day.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::compress_dates;
/// use support_ledger::models::ranges_label;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
/// let ranges = compress_dates([d(14), d(12), d(13), d(16)]);
///
/// assert_eq!(ranges.len(), 2);
/// assert_eq!(ranges_label(&ranges), "05/12\u{2013}05/14, 05/16");
/// ```
pub fn compress_dates<I>(dates: I) -> Vec<DateRange>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let sorted: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let mut ranges = Vec::new();

    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return ranges;
    };

    let mut range_start = first;
    let mut previous = first;

    for date in iter {
        if previous.succ_opt() == Some(date) {
            previous = date;
            continue;
        }
        ranges.push(DateRange {
            start: range_start,
            end: previous,
        });
        range_start = date;
        previous = date;
    }

    ranges.push(DateRange {
        start: range_start,
        end: previous,
    });

    ranges
}

/// The result of comparing a coverage set with an event span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// True when the set is exactly every day of the event.
    pub full_coverage: bool,
    /// The compressed coverage set. For full coverage this is the single event span.
    pub ranges: Vec<DateRange>,
}

impl Coverage {
    /// The display label of the covered days.
    pub fn label(&self) -> String {
        ranges_label(&self.ranges)
    }

    /// Converts the coverage into display groups for `subject`.
    pub fn into_groups(self, subject: &str) -> Vec<RangeGroup> {
        let full_coverage = self.full_coverage;
        self.ranges
            .into_iter()
            .map(|r| RangeGroup {
                subject: subject.to_string(),
                start: r.start,
                end: r.end,
                full_coverage,
            })
            .collect()
    }
}

/// Classifies a coverage set against the event span `[event_start, event_end]`.
///
/// Full coverage requires the minimum to equal `event_start`, the maximum to
/// equal `event_end`, and every day in between to be present. A set with the
/// right endpoints but an internal gap is partial.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::classify_coverage;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
///
/// let full = classify_coverage([d(12), d(13), d(14)], d(12), d(14));
/// assert!(full.full_coverage);
///
/// // Present on day 1 and day 3 only
/// let gapped = classify_coverage([d(12), d(14)], d(12), d(14));
/// assert!(!gapped.full_coverage);
/// assert_eq!(gapped.ranges.len(), 2);
/// assert_eq!(gapped.label(), "05/12, 05/14");
/// ```
pub fn classify_coverage<I>(dates: I, event_start: NaiveDate, event_end: NaiveDate) -> Coverage
where
    I: IntoIterator<Item = NaiveDate>,
{
    let ranges = compress_dates(dates);

    let full_coverage = match ranges.as_slice() {
        // One gap-free interval whose ends are the event's ends is exactly the
        // event's day set.
        [only] => only.start == event_start && only.end == event_end,
        _ => false,
    };

    Coverage {
        full_coverage,
        ranges,
    }
}

/// Display groups for one subject's coverage of an event.
pub fn coverage_groups<I>(
    subject: &str,
    dates: I,
    event_start: NaiveDate,
    event_end: NaiveDate,
) -> Vec<RangeGroup>
where
    I: IntoIterator<Item = NaiveDate>,
{
    classify_coverage(dates, event_start, event_end).into_groups(subject)
}
