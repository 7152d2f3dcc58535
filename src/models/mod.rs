//! Core data models for the Support-Date Accounting Engine.
//!
//! This module contains the input records (events, employees, support
//! assignments, holidays, periods) and the transient report outputs.

mod employee;
mod event;
mod holiday;
mod period;
mod report;
mod support;

pub use employee::Employee;
pub use event::{Event, EventType};
pub use holiday::HolidaySet;
pub use period::Period;
pub use report::{
    AllowanceReport, AllowanceRow, DateRange, EmployeeTotal, EventTotal, Participant,
    RANGE_LIST_SEPARATOR, RANGE_SEPARATOR, RangeGroup, RowKind, ranges_label,
};
pub use support::SupportAssignment;
