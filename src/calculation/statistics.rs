//! Event statistics for a reporting period.
//!
//! Counts of events by department, month and organizer, and the list of
//! employees who supported events in the period.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Employee, Event, Period, RangeGroup, SupportAssignment};

use super::date_ranges::classify_coverage;

/// A labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    /// What was counted (a department name or a `YYYY-MM` month).
    pub key: String,
    /// Number of events.
    pub count: usize,
}

/// Events run by one organizer within one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerCount {
    /// Organizer employee id.
    pub organizer_id: String,
    /// Organizer display name.
    pub organizer_name: String,
    /// The department the events belonged to.
    pub department: String,
    /// Number of events.
    pub count: usize,
}

/// One employee's support activity in the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupporterSummary {
    /// Employee identity.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Distinct events supported.
    pub event_count: usize,
    /// Coverage intervals, one subject per event id.
    pub coverage: Vec<RangeGroup>,
}

/// Statistics for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatistics {
    /// The period the statistics cover.
    pub period: Period,
    /// Events that lie entirely within the period.
    pub total_events: usize,
    /// Event counts per department, sorted by department.
    pub by_department: Vec<CountEntry>,
    /// Event counts per start month, ascending.
    pub by_month: Vec<CountEntry>,
    /// Event counts per organizer and department, most events first.
    pub by_organizer: Vec<OrganizerCount>,
    /// Supporters, most events supported first.
    pub supporters: Vec<SupporterSummary>,
}

/// Computes [`EventStatistics`] for a period.
///
/// Events count when they start on or after the period start and end on or
/// before the period end. Supporters count distinct events for which they
/// have at least one assignment dated inside the period.
pub fn event_statistics(
    events: &[Event],
    assignments: &[SupportAssignment],
    employees: &[Employee],
    period: &Period,
) -> EventStatistics {
    let directory: HashMap<&str, &Employee> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();

    let in_period: Vec<&Event> = events
        .iter()
        .filter(|e| e.start_date >= period.start_date && e.end_date <= period.end_date)
        .collect();

    let mut departments: BTreeMap<&str, usize> = BTreeMap::new();
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    let mut organizers: BTreeMap<(&str, &str), usize> = BTreeMap::new();

    for event in &in_period {
        *departments.entry(event.department.as_str()).or_default() += 1;
        *months
            .entry(event.start_date.format("%Y-%m").to_string())
            .or_default() += 1;

        if let Some(organizer_id) = event.organizer_id.as_deref() {
            *organizers
                .entry((organizer_id, event.department.as_str()))
                .or_default() += 1;
        }
    }

    let by_department = departments
        .into_iter()
        .map(|(key, count)| CountEntry {
            key: key.to_string(),
            count,
        })
        .collect();

    let by_month = months
        .into_iter()
        .map(|(key, count)| CountEntry { key, count })
        .collect();

    let mut by_organizer: Vec<OrganizerCount> = organizers
        .into_iter()
        .filter_map(|((organizer_id, department), count)| {
            let Some(organizer) = directory.get(organizer_id) else {
                debug!(organizer_id = %organizer_id, "Organizer not found; omitted from statistics");
                return None;
            };
            Some(OrganizerCount {
                organizer_id: organizer_id.to_string(),
                organizer_name: organizer.name.clone(),
                department: department.to_string(),
                count,
            })
        })
        .collect();
    by_organizer.sort_by_key(|o| Reverse(o.count));

    EventStatistics {
        period: *period,
        total_events: in_period.len(),
        by_department,
        by_month,
        by_organizer,
        supporters: supporter_summaries(events, assignments, &directory, period),
    }
}

fn supporter_summaries(
    events: &[Event],
    assignments: &[SupportAssignment],
    directory: &HashMap<&str, &Employee>,
    period: &Period,
) -> Vec<SupporterSummary> {
    let event_index: HashMap<&str, &Event> = events.iter().map(|e| (e.id.as_str(), e)).collect();

    // employee -> event -> dates
    let mut supported: BTreeMap<&str, BTreeMap<&str, BTreeSet<NaiveDate>>> = BTreeMap::new();
    for a in assignments.iter().filter(|a| period.contains_date(a.date)) {
        supported
            .entry(a.employee_id.as_str())
            .or_default()
            .entry(a.event_id.as_str())
            .or_default()
            .insert(a.date);
    }

    let mut summaries: Vec<SupporterSummary> = supported
        .into_iter()
        .filter_map(|(employee_id, per_event)| {
            let Some(employee) = directory.get(employee_id) else {
                debug!(employee_id = %employee_id, "Supporter not found; omitted from statistics");
                return None;
            };

            let event_count = per_event.len();
            let coverage = per_event
                .into_iter()
                .flat_map(|(event_id, dates)| {
                    let (start, end) = match event_index.get(event_id) {
                        Some(event) => (event.start_date, event.end_date),
                        // Unknown event: classify against the set's own bounds.
                        None => (
                            dates.first().copied().unwrap_or(period.start_date),
                            dates.last().copied().unwrap_or(period.end_date),
                        ),
                    };
                    classify_coverage(dates, start, end).into_groups(event_id)
                })
                .collect();

            Some(SupporterSummary {
                employee_id: employee_id.to_string(),
                name: employee.name.clone(),
                department: employee.department.clone(),
                event_count,
                coverage,
            })
        })
        .collect();

    summaries.sort_by_key(|s| Reverse(s.event_count));
    summaries
}
