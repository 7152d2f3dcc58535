//! HTTP API module for the Support-Date Accounting Engine.
//!
//! This module provides the REST API endpoints for computing allowance
//! reports, classifying coverage, holding a dataset and serving memoised
//! reports over it.

mod handlers;
mod memo;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use memo::{DEFAULT_MEMO_CAPACITY, ReportMemo};
pub use request::{AllowanceRequest, CoverageRequest, PeriodRequest, ReportQuery};
pub use response::{AllowanceResponse, ApiError, CoverageResponse, DatasetResponse};
pub use state::AppState;
