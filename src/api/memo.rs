//! Report memo for the HTTP layer.
//!
//! The engine itself keeps no state; the server keeps finished reports here,
//! keyed by period. They are all thrown away whenever the dataset changes.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::{AllowanceReport, Period};

/// Reports kept by [`ReportMemo::new`].
pub const DEFAULT_MEMO_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct Entries {
    reports: HashMap<Period, Arc<AllowanceReport>>,
    // Least recently used first.
    order: VecDeque<Period>,
}

impl Entries {
    fn touch(&mut self, period: Period) {
        if let Some(pos) = self.order.iter().position(|p| *p == period) {
            self.order.remove(pos);
        }
        self.order.push_back(period);
    }
}

/// Finished allowance reports keyed by period.
///
/// Holds at most `capacity` periods; storing one more drops the period
/// looked up least recently.
#[derive(Debug)]
pub struct ReportMemo {
    entries: Mutex<Entries>,
    capacity: usize,
}

impl Default for ReportMemo {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMO_CAPACITY)
    }
}

impl ReportMemo {
    /// Creates an empty memo holding up to [`DEFAULT_MEMO_CAPACITY`] reports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty memo holding up to `capacity` reports (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity: capacity.max(1),
        }
    }

    /// Returns the stored report for `period`, computing and storing it first if absent.
    ///
    /// The second value is true on a hit.
    pub fn get_or_compute<F>(&self, period: Period, compute: F) -> (Arc<AllowanceReport>, bool)
    where
        F: FnOnce() -> AllowanceReport,
    {
        {
            let mut entries = self.lock();
            if let Some(report) = entries.reports.get(&period).map(Arc::clone) {
                entries.touch(period);
                return (report, true);
            }
        }

        // Computed outside the lock; a concurrent miss for the same period
        // computes the same report and the later insert wins.
        let report = Arc::new(compute());

        let mut entries = self.lock();
        entries.reports.insert(period, Arc::clone(&report));
        entries.touch(period);
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.reports.remove(&oldest);
                tracing::debug!(start = %oldest.start_date, end = %oldest.end_date, "Evicted memoised report");
            }
        }
        (report, false)
    }

    /// Drops every stored report.
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.reports.clear();
        entries.order.clear();
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.lock().reports.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().reports.is_empty()
    }

    /// Maximum number of stored reports.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_second_lookup_is_a_hit() {
        let memo = ReportMemo::new();
        let period = Period::month(2025, 5).unwrap();
        let calls = Cell::new(0);

        let (_, hit) = memo.get_or_compute(period, || {
            calls.set(calls.get() + 1);
            AllowanceReport::empty(period)
        });
        assert!(!hit);

        let (report, hit) = memo.get_or_compute(period, || {
            calls.set(calls.get() + 1);
            AllowanceReport::empty(period)
        });
        assert!(hit);
        assert_eq!(report.period, period);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_periods_are_separate_keys() {
        let memo = ReportMemo::new();
        let may = Period::month(2025, 5).unwrap();
        let june = Period::month(2025, 6).unwrap();

        memo.get_or_compute(may, || AllowanceReport::empty(may));
        memo.get_or_compute(june, || AllowanceReport::empty(june));
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_clear_forces_recompute() {
        let memo = ReportMemo::new();
        let period = Period::month(2025, 5).unwrap();

        memo.get_or_compute(period, || AllowanceReport::empty(period));
        memo.clear();
        assert!(memo.is_empty());

        let (_, hit) = memo.get_or_compute(period, || AllowanceReport::empty(period));
        assert!(!hit);
    }

    #[test]
    fn test_capacity_keeps_most_recent_periods() {
        let memo = ReportMemo::with_capacity(2);
        let april = Period::month(2025, 4).unwrap();
        let may = Period::month(2025, 5).unwrap();
        let june = Period::month(2025, 6).unwrap();

        memo.get_or_compute(april, || AllowanceReport::empty(april));
        memo.get_or_compute(may, || AllowanceReport::empty(may));
        // April is used again, so May is now the oldest.
        let (_, hit) = memo.get_or_compute(april, || AllowanceReport::empty(april));
        assert!(hit);

        memo.get_or_compute(june, || AllowanceReport::empty(june));
        assert_eq!(memo.len(), 2);

        let (_, hit) = memo.get_or_compute(april, || AllowanceReport::empty(april));
        assert!(hit);
        let (_, hit) = memo.get_or_compute(may, || AllowanceReport::empty(may));
        assert!(!hit);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(ReportMemo::new().capacity(), DEFAULT_MEMO_CAPACITY);
        assert_eq!(ReportMemo::with_capacity(0).capacity(), 1);
    }
}
