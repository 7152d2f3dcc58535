//! CSV bulk import of events, employees, support assignments and holidays.
//!
//! Each file needs a header row. Event files need `id`, `start_date` and
//! `end_date` and accept the portal's upload columns (`event_name`,
//! `host_id`, `host`, `company_name`, `product_name`). Employee files need an
//! `id`. Assignment files need `event_id`, `employee_id` (or `user_id`) and
//! `date` (or `support_date`) columns. Holiday files need a `date` column and
//! may carry a `name`. Rows that
//! cannot be read are skipped and counted; only a source that cannot be read
//! at all is an error.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::calculation::parse_calendar_day;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Event, HolidaySet, SupportAssignment};

use super::dataset::{RecordCounts, collect_assignments, collect_employees, collect_events};
use super::raw::{RawAssignment, RawEmployee, RawEvent};

#[derive(Debug, Deserialize)]
struct HolidayRow {
    date: String,
    #[serde(default)]
    name: Option<String>,
}

fn import_error(context: &str, e: impl std::fmt::Display) -> EngineError {
    EngineError::ImportError {
        message: format!("{}: {}", context, e),
    }
}

/// Deserializes every row, skipping rows that fail and aborting on I/O errors.
fn read_rows<T, R>(reader: R, source: &str) -> EngineResult<(Vec<T>, usize)>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .headers()
        .map_err(|e| import_error(source, e))?;

    let mut rows = Vec::new();
    let mut skipped = 0;

    for (index, result) in csv_reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) if e.is_io_error() => return Err(import_error(source, e)),
            Err(e) => {
                // Header is line 1
                warn!(source, line = index + 2, error = %e, "Skipping unreadable CSV row");
                skipped += 1;
            }
        }
    }

    Ok((rows, skipped))
}

/// Reads the employee directory from CSV.
pub fn read_employees<R: Read>(reader: R) -> EngineResult<(Vec<Employee>, RecordCounts)> {
    let (rows, unreadable) = read_rows::<RawEmployee, R>(reader, "employees")?;
    let (employees, mut counts) = collect_employees(rows);
    counts.skipped += unreadable;

    info!(
        accepted = counts.accepted,
        skipped = counts.skipped,
        "Imported employees"
    );
    Ok((employees, counts))
}

/// Reads events from CSV.
///
/// `employees` is used to find the organizer of rows that name a `host`
/// but carry no `host_id`.
///
/// # Example
///
/// ```
/// use support_ledger::ingest::read_events;
///
/// let data = "id,event_name,start_date,end_date,event_type\n\
///             ev_001,Symposium,2025-05-12,2025-05-13,pharma\n\
///             ev_002,Broken,2025-05-14,2025-05-12,pharma\n";
/// let (events, counts) = read_events(data.as_bytes(), &[]).unwrap();
///
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].name, "Symposium");
/// assert_eq!(counts.skipped, 1);
/// ```
pub fn read_events<R: Read>(
    reader: R,
    employees: &[Employee],
) -> EngineResult<(Vec<Event>, RecordCounts)> {
    let (rows, unreadable) = read_rows::<RawEvent, R>(reader, "events")?;
    let (events, mut counts) = collect_events(rows, employees);
    counts.skipped += unreadable;

    info!(
        accepted = counts.accepted,
        skipped = counts.skipped,
        "Imported events"
    );
    Ok((events, counts))
}

/// Reads support assignments from CSV.
///
/// Repeated `(event, employee, date)` rows are kept once.
///
/// # Example
///
/// ```
/// use support_ledger::ingest::read_assignments;
///
/// let data = "event_id,employee_id,date\nev_001,emp_002,2025-05-13\nev_001,emp_002,not-a-date\n";
/// let (assignments, counts) = read_assignments(data.as_bytes()).unwrap();
///
/// assert_eq!(assignments.len(), 1);
/// assert_eq!(counts.skipped, 1);
/// ```
pub fn read_assignments<R: Read>(reader: R) -> EngineResult<(Vec<SupportAssignment>, RecordCounts)> {
    let (rows, unreadable) = read_rows::<RawAssignment, R>(reader, "assignments")?;
    let (assignments, mut counts) = collect_assignments(rows);
    counts.skipped += unreadable;

    info!(
        accepted = counts.accepted,
        skipped = counts.skipped,
        duplicates = counts.duplicates,
        "Imported support assignments"
    );
    Ok((assignments, counts))
}

/// Reads declared holidays from CSV.
pub fn read_holidays<R: Read>(reader: R) -> EngineResult<(HolidaySet, RecordCounts)> {
    let (rows, unreadable) = read_rows::<HolidayRow, R>(reader, "holidays")?;
    let mut counts = RecordCounts {
        skipped: unreadable,
        ..Default::default()
    };
    let mut holidays = HolidaySet::new();

    for row in rows {
        match parse_calendar_day("date", &row.date) {
            Ok(date) if holidays.insert(date) => counts.accepted += 1,
            Ok(_) => counts.duplicates += 1,
            Err(e) => {
                warn!(name = row.name.as_deref().unwrap_or(""), error = %e, "Skipping holiday row");
                counts.skipped += 1;
            }
        }
    }

    info!(
        accepted = counts.accepted,
        skipped = counts.skipped,
        "Imported holidays"
    );
    Ok((holidays, counts))
}

/// Reads the employee directory from a CSV file.
pub fn read_employees_from_path<P: AsRef<Path>>(
    path: P,
) -> EngineResult<(Vec<Employee>, RecordCounts)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| import_error(&path.display().to_string(), e))?;
    read_employees(file)
}

/// Reads events from a CSV file.
pub fn read_events_from_path<P: AsRef<Path>>(
    path: P,
    employees: &[Employee],
) -> EngineResult<(Vec<Event>, RecordCounts)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| import_error(&path.display().to_string(), e))?;
    read_events(file, employees)
}

/// Reads support assignments from a CSV file.
pub fn read_assignments_from_path<P: AsRef<Path>>(
    path: P,
) -> EngineResult<(Vec<SupportAssignment>, RecordCounts)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| import_error(&path.display().to_string(), e))?;
    read_assignments(file)
}

/// Reads declared holidays from a CSV file.
pub fn read_holidays_from_path<P: AsRef<Path>>(path: P) -> EngineResult<(HolidaySet, RecordCounts)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| import_error(&path.display().to_string(), e))?;
    read_holidays(file)
}
