//! Normalisation of a complete raw dataset.

use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculation::parse_calendar_day;
use crate::models::{Employee, Event, HolidaySet, SupportAssignment};

use super::raw::{RawAssignment, RawEmployee, RawEvent, RawRecord, non_blank};

/// Everything the engine reads, with string-typed dates.
///
/// Each list entry is read on its own: an entry that cannot be read is kept
/// as [`RawRecord::Unreadable`] and counted as skipped by [`RawDataset::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    /// Events.
    #[serde(default)]
    pub events: Vec<RawRecord<RawEvent>>,
    /// Employee directory.
    #[serde(default)]
    pub employees: Vec<RawRecord<RawEmployee>>,
    /// Support assignments.
    #[serde(default)]
    pub assignments: Vec<RawRecord<RawAssignment>>,
    /// Declared holidays as ISO calendar-day strings.
    #[serde(default)]
    pub holidays: Vec<RawRecord<String>>,
}

/// Everything the engine reads, normalised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Valid events.
    pub events: Vec<Event>,
    /// Employee directory.
    pub employees: Vec<Employee>,
    /// Support assignments, without repeats.
    pub assignments: Vec<SupportAssignment>,
    /// Declared holidays.
    pub holidays: HolidaySet,
}

/// Accepted and skipped counts for one kind of record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    /// Records kept.
    pub accepted: usize,
    /// Records dropped because they could not be read or broke an invariant.
    pub skipped: usize,
    /// Records dropped because an identical record was already kept.
    pub duplicates: usize,
}

/// What normalisation kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Event counts.
    pub events: RecordCounts,
    /// Employee counts.
    pub employees: RecordCounts,
    /// Assignment counts.
    pub assignments: RecordCounts,
    /// Holiday counts.
    pub holidays: RecordCounts,
}

impl IngestSummary {
    /// Total records skipped as unreadable or invalid.
    pub fn total_skipped(&self) -> usize {
        self.events.skipped
            + self.employees.skipped
            + self.assignments.skipped
            + self.holidays.skipped
    }
}

impl RawDataset {
    /// Converts every record, skipping the ones that fail.
    ///
    /// Unreadable entries, malformed dates, events that break their
    /// invariants, blank ids and repeated `(event, employee, date)`
    /// assignments are dropped with a log line and counted in the returned
    /// [`IngestSummary`]. Events without an organizer id get one from their
    /// `host` name when it matches an employee. Nothing here fails.
    ///
    /// # Example
    ///
    /// ```
    /// use support_ledger::ingest::{RawAssignment, RawDataset};
    ///
    /// let raw = RawDataset {
    ///     assignments: vec![
    ///         RawAssignment {
    ///             event_id: "ev_001".to_string(),
    ///             employee_id: "emp_002".to_string(),
    ///             date: "2025-05-13".to_string(),
    ///         }
    ///         .into(),
    ///         RawAssignment {
    ///             event_id: "ev_001".to_string(),
    ///             employee_id: "emp_002".to_string(),
    ///             date: "13 May".to_string(),
    ///         }
    ///         .into(),
    ///     ],
    ///     holidays: vec!["2025-05-05".to_string().into()],
    ///     ..Default::default()
    /// };
    ///
    /// let (dataset, summary) = raw.normalize();
    /// assert_eq!(dataset.assignments.len(), 1);
    /// assert_eq!(summary.assignments.skipped, 1);
    /// assert_eq!(dataset.holidays.len(), 1);
    /// ```
    pub fn normalize(self) -> (Dataset, IngestSummary) {
        let mut summary = IngestSummary::default();

        let (raws, unreadable) = readable(self.employees, "employee");
        let (employees, counts) = collect_employees(raws);
        summary.employees = counts;
        summary.employees.skipped += unreadable;

        let (raws, unreadable) = readable(self.events, "event");
        let (events, counts) = collect_events(raws, &employees);
        summary.events = counts;
        summary.events.skipped += unreadable;

        let (raws, unreadable) = readable(self.assignments, "assignment");
        let (assignments, counts) = collect_assignments(raws);
        summary.assignments = counts;
        summary.assignments.skipped += unreadable;

        let (values, unreadable) = readable(self.holidays, "holiday");
        summary.holidays.skipped = unreadable;
        let mut holidays = HolidaySet::new();
        for value in &values {
            match parse_calendar_day("holiday", value) {
                Ok(date) => {
                    if holidays.insert(date) {
                        summary.holidays.accepted += 1;
                    } else {
                        summary.holidays.duplicates += 1;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Skipping holiday");
                    summary.holidays.skipped += 1;
                }
            }
        }

        info!(
            events = summary.events.accepted,
            employees = summary.employees.accepted,
            assignments = summary.assignments.accepted,
            holidays = summary.holidays.accepted,
            skipped = summary.total_skipped(),
            "Normalised dataset"
        );

        (
            Dataset {
                events,
                employees,
                assignments,
                holidays,
            },
            summary,
        )
    }
}

/// Unwraps readable records; the second value counts the rest.
fn readable<T: DeserializeOwned>(records: Vec<RawRecord<T>>, kind: &str) -> (Vec<T>, usize) {
    let mut parsed = Vec::with_capacity(records.len());
    let mut unreadable = 0;

    for (index, record) in records.into_iter().enumerate() {
        match record.into_parsed() {
            Ok(record) => parsed.push(record),
            Err(e) => {
                warn!(kind, index, error = %e, "Skipping unreadable record");
                unreadable += 1;
            }
        }
    }

    (parsed, unreadable)
}

/// Converts raw employees, dropping records without an id.
pub(crate) fn collect_employees<I>(raws: I) -> (Vec<Employee>, RecordCounts)
where
    I: IntoIterator<Item = RawEmployee>,
{
    let mut counts = RecordCounts::default();
    let mut employees = Vec::new();

    for raw in raws {
        match Employee::try_from(raw) {
            Ok(employee) => {
                employees.push(employee);
                counts.accepted += 1;
            }
            Err(e) => {
                warn!(error = %e, "Skipping employee record");
                counts.skipped += 1;
            }
        }
    }

    (employees, counts)
}

/// Converts raw events, dropping unreadable or invalid ones.
///
/// An event with no organizer id takes the id of the first employee whose
/// name equals its `host`.
pub(crate) fn collect_events<I>(raws: I, employees: &[Employee]) -> (Vec<Event>, RecordCounts)
where
    I: IntoIterator<Item = RawEvent>,
{
    // Reversed so the first employee with a name wins.
    let by_name: HashMap<&str, &str> = employees
        .iter()
        .rev()
        .map(|e| (e.name.as_str(), e.id.as_str()))
        .collect();

    let mut counts = RecordCounts::default();
    let mut events = Vec::new();

    for raw in raws {
        let id = raw.id.clone();
        let host = non_blank(&raw.host);

        match Event::try_from(raw) {
            Ok(mut event) => {
                if event.organizer_id.is_none() {
                    if let Some(host) = host {
                        event.organizer_id = by_name.get(host.as_str()).map(|id| id.to_string());
                        if event.organizer_id.is_none() {
                            debug!(event_id = %event.id, host = %host, "Host not in employee directory");
                        }
                    }
                }
                events.push(event);
                counts.accepted += 1;
            }
            Err(e) => {
                warn!(event_id = %id, error = %e, "Skipping event record");
                counts.skipped += 1;
            }
        }
    }

    (events, counts)
}

/// Converts raw assignments, dropping unreadable records and repeats.
pub(crate) fn collect_assignments<I>(raws: I) -> (Vec<SupportAssignment>, RecordCounts)
where
    I: IntoIterator<Item = RawAssignment>,
{
    let mut counts = RecordCounts::default();
    let mut seen = HashSet::new();
    let mut assignments = Vec::new();

    for raw in raws {
        match SupportAssignment::try_from(raw) {
            Ok(assignment) => {
                if seen.insert(assignment.clone()) {
                    assignments.push(assignment);
                    counts.accepted += 1;
                } else {
                    counts.duplicates += 1;
                }
            }
            Err(e) => {
                warn!(error = %e, "Skipping support assignment");
                counts.skipped += 1;
            }
        }
    }

    (assignments, counts)
}
