//! Raw input records.
//!
//! Records as they arrive from the portal's tables or a CSV export: dates are
//! strings (plain `YYYY-MM-DD` or full timestamps) and optional text may be
//! blank. Converting a raw record into its model type reads calendar days and
//! checks invariants; failures are returned as errors for the caller to skip.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::calculation::parse_calendar_day;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Event, EventType, SupportAssignment};

/// One record of a JSON list, read without failing the list.
///
/// A record that does not have the shape of `T` (a `null` date, a number
/// where text belongs, a missing field) is kept as its JSON value so the
/// records around it are still read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecord<T> {
    /// The record read as `T`.
    Parsed(T),
    /// The record as received.
    Unreadable(serde_json::Value),
}

impl<T: DeserializeOwned> RawRecord<T> {
    /// Returns the parsed record, or the error explaining why it is unreadable.
    pub fn into_parsed(self) -> Result<T, serde_json::Error> {
        match self {
            RawRecord::Parsed(record) => Ok(record),
            RawRecord::Unreadable(value) => serde_json::from_value(value),
        }
    }
}

impl<T> From<T> for RawRecord<T> {
    fn from(record: T) -> Self {
        RawRecord::Parsed(record)
    }
}

/// An event with string-typed dates.
///
/// Accepts the portal's upload column names (`event_name`, `host_id`,
/// `company_name`, `product_name`). `host` is the organizer's display name,
/// used to find the organizer when `organizer_id` is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event id.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default, alias = "event_name")]
    pub name: String,
    /// First day, as a date or timestamp string.
    pub start_date: String,
    /// Last day, as a date or timestamp string.
    pub end_date: String,
    /// Optional setup day.
    #[serde(default)]
    pub setup_date: Option<String>,
    /// Running department.
    #[serde(default)]
    pub department: String,
    /// Event category.
    #[serde(default)]
    pub event_type: EventType,
    /// Organizer employee id.
    #[serde(default, alias = "host_id")]
    pub organizer_id: Option<String>,
    /// Organizer display name.
    #[serde(default)]
    pub host: Option<String>,
    /// Region reference.
    #[serde(default)]
    pub region_id: Option<String>,
    /// Region label.
    #[serde(default)]
    pub region: Option<String>,
    /// Venue label.
    #[serde(default)]
    pub venue: Option<String>,
    /// Company label.
    #[serde(default, alias = "company_name")]
    pub company: Option<String>,
    /// Product label.
    #[serde(default, alias = "product_name")]
    pub product: Option<String>,
}

/// An employee record with optional attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmployee {
    /// Employee id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Department.
    #[serde(default)]
    pub department: String,
    /// Job title.
    #[serde(default)]
    pub job_title: String,
}

/// A support assignment with a string-typed date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAssignment {
    /// Supported event id.
    pub event_id: String,
    /// Supporting employee id.
    #[serde(alias = "user_id")]
    pub employee_id: String,
    /// Day of support.
    #[serde(alias = "support_date")]
    pub date: String,
}

/// Blank strings become `None`; everything else is trimmed.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_id(kind: &str, field: &str, value: &str) -> EngineResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidRecord {
            kind: kind.to_string(),
            message: format!("{} is blank", field),
        });
    }
    Ok(trimmed.to_string())
}

impl TryFrom<RawEvent> for Event {
    type Error = EngineError;

    fn try_from(raw: RawEvent) -> EngineResult<Self> {
        let id = required_id("event", "id", &raw.id)?;
        let start_date = parse_calendar_day("start_date", &raw.start_date)?;
        let end_date = parse_calendar_day("end_date", &raw.end_date)?;
        let setup_date = match non_blank(&raw.setup_date) {
            Some(value) => Some(parse_calendar_day("setup_date", &value)?),
            None => None,
        };

        let event = Event {
            id,
            name: raw.name,
            start_date,
            end_date,
            setup_date,
            department: raw.department,
            event_type: raw.event_type,
            organizer_id: non_blank(&raw.organizer_id),
            region_id: non_blank(&raw.region_id),
            region: non_blank(&raw.region),
            venue: non_blank(&raw.venue),
            company: non_blank(&raw.company),
            product: non_blank(&raw.product),
        };
        event.validate()?;
        Ok(event)
    }
}

impl TryFrom<RawEmployee> for Employee {
    type Error = EngineError;

    fn try_from(raw: RawEmployee) -> EngineResult<Self> {
        Ok(Employee {
            id: required_id("employee", "id", &raw.id)?,
            name: raw.name,
            department: raw.department,
            job_title: raw.job_title.trim().to_string(),
        })
    }
}

impl TryFrom<RawAssignment> for SupportAssignment {
    type Error = EngineError;

    fn try_from(raw: RawAssignment) -> EngineResult<Self> {
        let date: NaiveDate = parse_calendar_day("date", &raw.date)?;
        Ok(SupportAssignment {
            event_id: required_id("assignment", "event_id", &raw.event_id)?,
            employee_id: required_id("assignment", "employee_id", &raw.employee_id)?,
            date,
        })
    }
}
