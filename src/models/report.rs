//! Allowance report models.
//!
//! This module contains the transient outputs of the engine: day-level
//! [`AllowanceRow`]s, the per-employee and per-event roll-ups, and the
//! [`DateRange`] / [`RangeGroup`] display types produced from coverage sets.
//! None of these are persisted; each is freshly built by the call that
//! returns it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// Separator between the two ends of a multi-day label (U+2013 EN DASH).
pub const RANGE_SEPARATOR: &str = "\u{2013}";

/// Separator between consecutive ranges in a compound label.
pub const RANGE_LIST_SEPARATOR: &str = ", ";

const LABEL_FORMAT: &str = "%m/%d";

/// A closed interval of consecutive calendar days.
///
/// # Example
///
/// ```
/// use support_ledger::models::DateRange;
/// use chrono::NaiveDate;
///
/// let single = DateRange::single(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap());
/// assert_eq!(single.label(), "05/03");
///
/// let span = DateRange {
///     start: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
///     end: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
/// };
/// assert_eq!(span.label(), "05/03\u{2013}05/05");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// A range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns true if the range covers a single day.
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Renders `MM/DD` for a single day and `MM/DD–MM/DD` otherwise.
    pub fn label(&self) -> String {
        if self.is_single_day() {
            self.start.format(LABEL_FORMAT).to_string()
        } else {
            format!(
                "{}{}{}",
                self.start.format(LABEL_FORMAT),
                RANGE_SEPARATOR,
                self.end.format(LABEL_FORMAT)
            )
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Joins range labels into a single display string; empty input gives "".
pub fn ranges_label(ranges: &[DateRange]) -> String {
    ranges
        .iter()
        .map(DateRange::label)
        .collect::<Vec<_>>()
        .join(RANGE_LIST_SEPARATOR)
}

/// One displayable coverage interval for a subject (usually an employee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeGroup {
    /// The subject the coverage belongs to.
    pub subject: String,
    /// First day of the interval.
    pub start: NaiveDate,
    /// Last day of the interval.
    pub end: NaiveDate,
    /// True when the subject covered every day of the event.
    pub full_coverage: bool,
}

/// Why an allowance row was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// The organizer's allowance summed over the whole event span, plus the setup day.
    Organizer,
    /// The organizer's setup-day allowance, repeated on its own row. The
    /// [`RowKind::Organizer`] row already includes it.
    SetupDay,
    /// A supporter's allowance for one assignment day.
    Support,
}

/// A single computed allowance line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceRow {
    /// The employee owed the allowance.
    pub employee_id: String,
    /// Employee display name.
    pub name: String,
    /// Employee department.
    pub department: String,
    /// Employee job title.
    pub job_title: String,
    /// The event the work was for.
    pub event_id: String,
    /// Event display name.
    pub event_name: String,
    /// What produced this row.
    pub kind: RowKind,
    /// The days this row accounts for.
    pub window: DateRange,
    /// The allowance amount.
    pub amount: Decimal,
}

/// Total allowance for one employee over the report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTotal {
    /// Employee identity.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Job title.
    pub job_title: String,
    /// Sum of every row attributed to the employee. May be zero.
    pub total_amount: Decimal,
}

/// One employee's combined contribution to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Employee identity.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Job title.
    pub job_title: String,
    /// The days this employee worked the event.
    pub date_range_label: String,
    /// Combined allowance for the event.
    pub amount: Decimal,
}

/// Total allowance for one event with its de-duplicated participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTotal {
    /// Event identity.
    pub event_id: String,
    /// Event display name.
    pub event_name: String,
    /// The event span label.
    pub date_range_label: String,
    /// Region label, if any.
    pub region: Option<String>,
    /// Venue label, if any.
    pub venue: Option<String>,
    /// Organizer display name, if the organizer was found.
    pub organizer_name: Option<String>,
    /// Sum of every row for the event. Never zero in a report.
    pub total_amount: Decimal,
    /// One entry per employee, in first-contribution order.
    pub participants: Vec<Participant>,
    /// Coverage intervals of every participant.
    pub coverage: Vec<RangeGroup>,
}

/// The result of aggregating a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceReport {
    /// The period the report covers.
    pub period: Period,
    /// One entry per employee with at least one row.
    pub per_employee: Vec<EmployeeTotal>,
    /// One entry per event with a non-zero total.
    pub per_event: Vec<EventTotal>,
    /// Sum of all employee totals.
    pub grand_total: Decimal,
    /// Every row behind the totals, in emission order.
    pub rows: Vec<AllowanceRow>,
}

impl AllowanceReport {
    /// Creates an empty report for the period.
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            per_employee: Vec::new(),
            per_event: Vec::new(),
            grand_total: Decimal::ZERO,
            rows: Vec::new(),
        }
    }

    /// Rows attributed to one employee, for a drill-down view.
    pub fn rows_for_employee<'a>(
        &'a self,
        employee_id: &'a str,
    ) -> impl Iterator<Item = &'a AllowanceRow> + 'a {
        self.rows.iter().filter(move |r| r.employee_id == employee_id)
    }

    /// Looks up an employee total.
    pub fn employee(&self, employee_id: &str) -> Option<&EmployeeTotal> {
        self.per_employee
            .iter()
            .find(|e| e.employee_id == employee_id)
    }

    /// Looks up an event total.
    pub fn event(&self, event_id: &str) -> Option<&EventTotal> {
        self.per_event.iter().find(|e| e.event_id == event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_single_day_label_is_zero_padded() {
        let range = DateRange::single(make_date("2025-01-07"));
        assert_eq!(range.label(), "01/07");
    }

    #[test]
    fn test_multi_day_label_uses_en_dash() {
        let range = DateRange {
            start: make_date("2025-09-29"),
            end: make_date("2025-10-02"),
        };
        assert_eq!(range.label(), "09/29–10/02");
        assert_eq!(range.to_string(), "09/29–10/02");
    }

    #[test]
    fn test_ranges_label_joins_with_comma() {
        let ranges = vec![
            DateRange::single(make_date("2025-05-12")),
            DateRange {
                start: make_date("2025-05-14"),
                end: make_date("2025-05-15"),
            },
        ];
        assert_eq!(ranges_label(&ranges), "05/12, 05/14–05/15");
    }

    #[test]
    fn test_ranges_label_empty() {
        assert_eq!(ranges_label(&[]), "");
    }

    #[test]
    fn test_row_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&RowKind::SetupDay).unwrap(),
            "\"setup_day\""
        );
    }

    #[test]
    fn test_empty_report_has_zero_total() {
        let period = Period::month(2025, 5).unwrap();
        let report = AllowanceReport::empty(period);
        assert_eq!(report.grand_total, Decimal::ZERO);
        assert!(report.per_employee.is_empty());
        assert!(report.per_event.is_empty());
        assert_eq!(report.rows_for_employee("emp_001").count(), 0);
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let total = EmployeeTotal {
            employee_id: "emp_001".to_string(),
            name: "Kim Minji".to_string(),
            department: "Ops".to_string(),
            job_title: "Manager".to_string(),
            total_amount: Decimal::from(150000),
        };
        let json = serde_json::to_string(&total).unwrap();
        assert!(json.contains("\"total_amount\":\"150000\""));
    }
}
