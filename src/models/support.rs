//! Support assignment model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single "this employee supported this event on this day" fact.
///
/// All assignments sharing an `(event_id, employee_id)` pair make up that
/// employee's coverage set for the event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SupportAssignment {
    /// The supported event.
    pub event_id: String,
    /// The supporting employee.
    pub employee_id: String,
    /// The calendar day of support.
    pub date: NaiveDate,
}
