//! Request types for the Support-Date Accounting Engine API.
//!
//! This module defines the JSON request bodies and query strings accepted by
//! the API endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::parse_calendar_day;
use crate::error::{EngineError, EngineResult};
use crate::ingest::RawDataset;
use crate::models::Period;

/// A reporting period in a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl TryFrom<PeriodRequest> for Period {
    type Error = EngineError;

    fn try_from(req: PeriodRequest) -> EngineResult<Self> {
        Period::new(req.start_date, req.end_date)
    }
}

/// Request body for the `POST /allowances` endpoint.
///
/// Carries a complete raw dataset alongside the period to report on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceRequest {
    /// The period to report on.
    pub period: PeriodRequest,
    /// Events, employees, assignments and holidays.
    #[serde(flatten)]
    pub dataset: RawDataset,
}

/// Request body for the `POST /coverage` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRequest {
    /// Label for the range groups in the response.
    #[serde(default)]
    pub subject: Option<String>,
    /// First day of the event.
    pub event_start: NaiveDate,
    /// Last day of the event.
    pub event_end: NaiveDate,
    /// The coverage set, as date or timestamp strings.
    pub dates: Vec<String>,
}

impl CoverageRequest {
    /// Reads every date in the request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedDate`] for the first unreadable date, or
    /// [`EngineError::InvalidPeriod`] when the event ends before it starts.
    pub fn parse_dates(&self) -> EngineResult<Vec<NaiveDate>> {
        Period::new(self.event_start, self.event_end)?;
        self.dates
            .iter()
            .map(|d| parse_calendar_day("dates", d))
            .collect()
    }
}

/// Query string for the `GET /reports/*` endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportQuery {
    /// First day of the period (inclusive).
    pub start: NaiveDate,
    /// Last day of the period (inclusive).
    pub end: NaiveDate,
}

impl TryFrom<ReportQuery> for Period {
    type Error = EngineError;

    fn try_from(query: ReportQuery) -> EngineResult<Self> {
        Period::new(query.start, query.end)
    }
}
