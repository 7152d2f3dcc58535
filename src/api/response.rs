//! Response types for the Support-Date Accounting Engine API.
//!
//! This module defines the success bodies, the error response structures and
//! the mapping from engine errors to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ingest::IngestSummary;
use crate::models::{AllowanceReport, DateRange, RangeGroup};

/// Body of a successful `POST /allowances` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceResponse {
    /// The computed report.
    #[serde(flatten)]
    pub report: AllowanceReport,
    /// What was skipped while reading the request dataset.
    pub ingest: IngestSummary,
}

/// Body of a successful `POST /coverage` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResponse {
    /// True when the dates are exactly the event span.
    pub full_coverage: bool,
    /// Display label of the covered days.
    pub label: String,
    /// The compressed ranges.
    pub ranges: Vec<DateRange>,
    /// The ranges as display groups.
    pub groups: Vec<RangeGroup>,
}

/// Body of a successful `PUT /dataset` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetResponse {
    /// What was kept and skipped.
    pub ingest: IngestSummary,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid query string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::with_details(
            "INVALID_QUERY",
            message,
            "Expected ?start=YYYY-MM-DD&end=YYYY-MM-DD",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidRateTable { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::MalformedDate { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "MALFORMED_DATE",
                    message,
                    format!("Field '{}' must be YYYY-MM-DD or an ISO timestamp", field),
                ),
            ),
            EngineError::InvalidEvent { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_EVENT", message),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    "The period end must not precede its start",
                ),
            ),
            EngineError::InvalidRecord { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_RECORD", message),
            ),
            EngineError::ImportError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("IMPORT_ERROR", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_period_maps_to_bad_request() {
        let engine_error = EngineError::InvalidPeriod {
            message: "2025-05-31 is after 2025-05-01".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_PERIOD");
    }

    #[test]
    fn test_malformed_date_maps_to_bad_request() {
        let api_error: ApiErrorResponse = EngineError::MalformedDate {
            field: "dates".to_string(),
            value: "05/12".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "MALFORMED_DATE");
        assert!(api_error.error.message.contains("05/12"));
    }

    #[test]
    fn test_config_errors_map_to_server_error() {
        let api_error: ApiErrorResponse = EngineError::InvalidRateTable {
            path: "rates/x.yaml".to_string(),
            message: "negative".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
