//! Support aggregation.
//!
//! This module turns events, support assignments and employees into an
//! [`AllowanceReport`]: the transient allowance rows for a period, rolled up
//! per employee and per event.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AllowanceReport, AllowanceRow, DateRange, Employee, EmployeeTotal, Event, EventTotal,
    HolidaySet, Participant, Period, RangeGroup, RowKind, SupportAssignment,
};

use super::allowance::{daily_allowance, setup_day_allowance, span_allowance};
use super::date_ranges::classify_coverage;
use super::policy::AllowancePolicy;

/// Builds the allowance report for a period.
///
/// # Arguments
///
/// * `events` - Candidate events; only those whose start date lies in `period` are reported
/// * `assignments` - Support assignments; duplicates of `(event, employee, date)` count once
/// * `employees` - Employee directory used for organizer and supporter lookups
/// * `holidays` - Declared non-working days
/// * `policy` - Seniority ladder and rate tables
/// * `period` - The reporting period
///
/// # Returns
///
/// An [`AllowanceReport`]. Per-employee totals keep zero amounts; per-event
/// totals of zero are dropped. Lookup misses and invalid events are skipped.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::{aggregate, AllowancePolicy};
/// use support_ledger::models::{Employee, Event, EventType, HolidaySet, Period, SupportAssignment};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
/// let event = Event {
///     id: "ev_001".to_string(),
///     name: "Oncology Symposium".to_string(),
///     start_date: d(12),
///     end_date: d(14),
///     setup_date: None,
///     department: "Conference Team 1".to_string(),
///     event_type: EventType::Conference,
///     organizer_id: Some("emp_001".to_string()),
///     region_id: Some("busan".to_string()),
///     region: Some("Busan".to_string()),
///     venue: Some("BEXCO".to_string()),
///     company: None,
///     product: None,
/// };
/// let organizer = Employee {
///     id: "emp_001".to_string(),
///     name: "Kim Minji".to_string(),
///     department: "Conference Team 1".to_string(),
///     job_title: "Manager".to_string(),
/// };
///
/// let report = aggregate(
///     &[event],
///     &[],
///     &[organizer],
///     &HolidaySet::new(),
///     &AllowancePolicy::default(),
///     &Period::month(2025, 5).unwrap(),
/// );
///
/// assert_eq!(report.grand_total, Decimal::from(120_000));
/// assert_eq!(report.per_event[0].date_range_label, "05/12\u{2013}05/14");
/// ```
pub fn aggregate(
    events: &[Event],
    assignments: &[SupportAssignment],
    employees: &[Employee],
    holidays: &HolidaySet,
    policy: &AllowancePolicy,
    period: &Period,
) -> AllowanceReport {
    let directory: HashMap<&str, &Employee> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();
    let support_by_event = group_assignments(assignments);

    let mut rows = Vec::new();
    let mut reported_events = Vec::new();

    for event in events.iter().filter(|e| period.contains_date(e.start_date)) {
        if let Err(e) = event.validate() {
            warn!(event_id = %event.id, error = %e, "Skipping invalid event");
            continue;
        }

        let first_row = rows.len();
        push_organizer_rows(event, &directory, holidays, policy, &mut rows);

        if let Some(supports) = support_by_event.get(event.id.as_str()) {
            for (employee_id, date) in supports {
                let Some(employee) = directory.get(employee_id) else {
                    debug!(
                        event_id = %event.id,
                        employee_id = %employee_id,
                        "Supporter not found; skipping assignment"
                    );
                    continue;
                };
                let day = daily_allowance(*date, event, &employee.job_title, holidays, policy);
                rows.push(make_row(
                    employee,
                    event,
                    RowKind::Support,
                    DateRange::single(*date),
                    day.amount,
                ));
            }
        }

        reported_events.push((event, first_row..rows.len()));
    }

    let per_employee = employee_totals(&rows, policy);
    let per_event = reported_events
        .into_iter()
        .filter_map(|(event, range)| event_total(event, &rows[range], &directory))
        .collect();
    let grand_total = per_employee.iter().map(|e| e.total_amount).sum();

    AllowanceReport {
        period: *period,
        per_employee,
        per_event,
        grand_total,
        rows,
    }
}

/// Groups assignments by event id, dropping repeats and keeping first-seen order.
fn group_assignments(assignments: &[SupportAssignment]) -> HashMap<&str, Vec<(&str, NaiveDate)>> {
    let mut seen = HashSet::new();
    let mut grouped: HashMap<&str, Vec<(&str, NaiveDate)>> = HashMap::new();

    for a in assignments {
        let key = (a.event_id.as_str(), a.employee_id.as_str(), a.date);
        if !seen.insert(key) {
            continue;
        }
        grouped
            .entry(a.event_id.as_str())
            .or_default()
            .push((a.employee_id.as_str(), a.date));
    }

    grouped
}

fn push_organizer_rows(
    event: &Event,
    directory: &HashMap<&str, &Employee>,
    holidays: &HolidaySet,
    policy: &AllowancePolicy,
    rows: &mut Vec<AllowanceRow>,
) {
    let Some(organizer_id) = event.organizer_id.as_deref() else {
        return;
    };
    let Some(organizer) = directory.get(organizer_id) else {
        debug!(
            event_id = %event.id,
            organizer_id = %organizer_id,
            "Organizer not found; skipping organizer rows"
        );
        return;
    };

    let setup = setup_day_allowance(event, &organizer.job_title, holidays, policy);
    let setup_amount = setup.as_ref().map_or(Decimal::ZERO, |s| s.amount);

    // Setup amount goes into the main row and is repeated in its own row.
    let amount = span_allowance(event, &organizer.job_title, holidays, policy) + setup_amount;
    rows.push(make_row(
        organizer,
        event,
        RowKind::Organizer,
        DateRange {
            start: event.start_date,
            end: event.end_date,
        },
        amount,
    ));

    if let Some(setup) = setup.filter(|s| !s.amount.is_zero()) {
        rows.push(make_row(
            organizer,
            event,
            RowKind::SetupDay,
            DateRange::single(setup.date),
            setup.amount,
        ));
    }
}

fn make_row(
    employee: &Employee,
    event: &Event,
    kind: RowKind,
    window: DateRange,
    amount: Decimal,
) -> AllowanceRow {
    AllowanceRow {
        employee_id: employee.id.clone(),
        name: employee.name.clone(),
        department: employee.department.clone(),
        job_title: employee.job_title.clone(),
        event_id: event.id.clone(),
        event_name: event.name.clone(),
        kind,
        window,
        amount,
    }
}

/// Sums rows per employee, ordered by seniority with ties in first-seen order.
fn employee_totals(rows: &[AllowanceRow], policy: &AllowancePolicy) -> Vec<EmployeeTotal> {
    let mut totals: Vec<EmployeeTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        match index.get(row.employee_id.as_str()) {
            Some(&i) => totals[i].total_amount += row.amount,
            None => {
                index.insert(row.employee_id.as_str(), totals.len());
                totals.push(EmployeeTotal {
                    employee_id: row.employee_id.clone(),
                    name: row.name.clone(),
                    department: row.department.clone(),
                    job_title: row.job_title.clone(),
                    total_amount: row.amount,
                });
            }
        }
    }

    let ladder = policy.ladder();
    totals.sort_by_key(|t| ladder.sort_key(&t.job_title));
    totals
}

/// Rolls up one event's rows; `None` when the event total is zero.
fn event_total(
    event: &Event,
    rows: &[AllowanceRow],
    directory: &HashMap<&str, &Employee>,
) -> Option<EventTotal> {
    let total_amount: Decimal = rows.iter().map(|r| r.amount).sum();
    if total_amount.is_zero() {
        debug!(event_id = %event.id, "Event total is zero; omitted from report");
        return None;
    }

    struct Contribution<'a> {
        first: &'a AllowanceRow,
        amount: Decimal,
        dates: BTreeSet<NaiveDate>,
    }

    let mut contributions: Vec<Contribution<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let i = *index.entry(row.employee_id.as_str()).or_insert_with(|| {
            contributions.push(Contribution {
                first: row,
                amount: Decimal::ZERO,
                dates: BTreeSet::new(),
            });
            contributions.len() - 1
        });
        let entry = &mut contributions[i];
        entry.amount += row.amount;
        entry
            .dates
            .extend(row.window.start.iter_days().take_while(|d| *d <= row.window.end));
    }

    let event_span = DateRange {
        start: event.start_date,
        end: event.end_date,
    };

    let mut participants = Vec::new();
    let mut coverage: Vec<RangeGroup> = Vec::new();

    for c in contributions {
        let classified = classify_coverage(c.dates, event.start_date, event.end_date);
        let date_range_label = if classified.full_coverage {
            event_span.label()
        } else {
            classified.label()
        };

        participants.push(Participant {
            employee_id: c.first.employee_id.clone(),
            name: c.first.name.clone(),
            department: c.first.department.clone(),
            job_title: c.first.job_title.clone(),
            date_range_label,
            amount: c.amount,
        });
        coverage.extend(classified.into_groups(&c.first.employee_id));
    }

    let organizer_name = event
        .organizer_id
        .as_deref()
        .and_then(|id| directory.get(id))
        .map(|e| e.name.clone());

    Some(EventTotal {
        event_id: event.id.clone(),
        event_name: event.name.clone(),
        date_range_label: event_span.label(),
        region: event.region.clone(),
        venue: event.venue.clone(),
        organizer_name,
        total_amount,
        participants,
        coverage,
    })
}
