//! HTTP request handlers for the Support-Date Accounting Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{aggregate, classify_coverage, event_statistics};
use crate::error::EngineError;
use crate::ingest::RawDataset;
use crate::models::Period;

use super::request::{AllowanceRequest, CoverageRequest, ReportQuery};
use super::response::{
    AllowanceResponse, ApiError, ApiErrorResponse, CoverageResponse, DatasetResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/allowances", post(allowances_handler))
        .route("/coverage", post(coverage_handler))
        .route("/dataset", put(dataset_handler))
        .route("/reports/allowances", get(allowance_report_handler))
        .route("/reports/statistics", get(statistics_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON body rejection to a 400 response.
fn json_rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Reads the report period from the query string.
fn query_period(
    query: Result<Query<ReportQuery>, QueryRejection>,
    correlation_id: Uuid,
) -> Result<Period, Response> {
    let Query(query) = query.map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid report query"
        );
        json_response(
            StatusCode::BAD_REQUEST,
            ApiError::invalid_query(rejection.body_text()),
        )
    })?;

    Period::try_from(query).map_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Invalid report period");
        error_response(err)
    })
}

/// Handler for POST /allowances endpoint.
///
/// Aggregates the dataset carried in the request body. Nothing is stored.
async fn allowances_handler(
    State(state): State<AppState>,
    payload: Result<Json<AllowanceRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing allowance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(rejection, correlation_id),
    };

    let period = match Period::try_from(request.period) {
        Ok(period) => period,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid period");
            return error_response(err);
        }
    };

    let start_time = Instant::now();
    let (dataset, ingest) = request.dataset.normalize();
    let report = aggregate(
        &dataset.events,
        &dataset.assignments,
        &dataset.employees,
        &dataset.holidays,
        state.config().policy(),
        &period,
    );

    info!(
        correlation_id = %correlation_id,
        events = report.per_event.len(),
        employees = report.per_employee.len(),
        grand_total = %report.grand_total,
        skipped = ingest.total_skipped(),
        duration_us = start_time.elapsed().as_micros(),
        "Allowance report completed"
    );

    json_response(StatusCode::OK, AllowanceResponse { report, ingest })
}

/// Handler for POST /coverage endpoint.
///
/// Classifies a date set against an event span.
async fn coverage_handler(payload: Result<Json<CoverageRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(rejection, correlation_id),
    };

    let dates = match request.parse_dates() {
        Ok(dates) => dates,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid coverage request");
            return error_response(err);
        }
    };

    let coverage = classify_coverage(dates, request.event_start, request.event_end);
    let label = coverage.label();
    let ranges = coverage.ranges.clone();
    let full_coverage = coverage.full_coverage;
    let groups = coverage.into_groups(request.subject.as_deref().unwrap_or(""));

    info!(
        correlation_id = %correlation_id,
        full_coverage,
        ranges = ranges.len(),
        "Coverage classified"
    );

    json_response(
        StatusCode::OK,
        CoverageResponse {
            full_coverage,
            label,
            ranges,
            groups,
        },
    )
}

/// Handler for PUT /dataset endpoint.
///
/// Replaces the held dataset and invalidates every memoised report.
async fn dataset_handler(
    State(state): State<AppState>,
    payload: Result<Json<RawDataset>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => return json_rejection_response(rejection, correlation_id),
    };

    let (dataset, ingest) = raw.normalize();
    state.replace_dataset(dataset).await;

    info!(
        correlation_id = %correlation_id,
        events = ingest.events.accepted,
        assignments = ingest.assignments.accepted,
        skipped = ingest.total_skipped(),
        "Dataset replaced"
    );

    json_response(StatusCode::OK, DatasetResponse { ingest })
}

/// Handler for GET /reports/allowances endpoint.
///
/// Reports over the held dataset, reusing a memoised report when one exists
/// for the same period.
async fn allowance_report_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let period = match query_period(query, correlation_id) {
        Ok(period) => period,
        Err(response) => return response,
    };

    // Held across the memo insert so a concurrent dataset swap cannot
    // interleave with it.
    let dataset = state.dataset().read().await;
    let (report, hit) = state.memo().get_or_compute(period, || {
        aggregate(
            &dataset.events,
            &dataset.assignments,
            &dataset.employees,
            &dataset.holidays,
            state.config().policy(),
            &period,
        )
    });
    drop(dataset);

    info!(
        correlation_id = %correlation_id,
        start = %period.start_date,
        end = %period.end_date,
        memo_hit = hit,
        grand_total = %report.grand_total,
        "Allowance report served"
    );

    json_response(StatusCode::OK, report.as_ref())
}

/// Handler for GET /reports/statistics endpoint.
async fn statistics_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let period = match query_period(query, correlation_id) {
        Ok(period) => period,
        Err(response) => return response,
    };

    let dataset = state.dataset().read().await;
    let stats = event_statistics(
        &dataset.events,
        &dataset.assignments,
        &dataset.employees,
        &period,
    );
    drop(dataset);

    info!(
        correlation_id = %correlation_id,
        total_events = stats.total_events,
        supporters = stats.supporters.len(),
        "Statistics served"
    );

    json_response(StatusCode::OK, stats)
}
