//! Calculation logic for the Support-Date Accounting Engine.
//!
//! This module contains the calendar classifier, the date-range compressor and
//! coverage classifier, the declarative allowance rate table with its
//! seniority-based exemption, the per-day allowance calculator, the support
//! aggregator, and period statistics.

mod aggregation;
mod allowance;
mod calendar;
mod date_ranges;
mod policy;
mod rate_table;
mod statistics;

pub use aggregation::aggregate;
pub use allowance::{DailyAllowance, daily_allowance, setup_day_allowance, span_allowance};
pub use calendar::{DayKind, get_day_kind, is_rest_day, parse_calendar_day};
pub use date_ranges::{Coverage, classify_coverage, compress_dates, coverage_groups};
pub use policy::{AllowancePolicy, DEFAULT_EXEMPT_TIERS, DEFAULT_JOB_TITLES, SeniorityLadder};
pub use rate_table::{
    CONFERENCE_SETUP_RATE, DayClass, REST_DAY_CONFERENCE_RATE, REST_DAY_PHARMA_LOCAL_RATE,
    REST_DAY_PHARMA_REGIONAL_RATE, RateKey, RateTable, RegionClass, SetupRateKey,
    WORKDAY_REGIONAL_RATE,
};
pub use statistics::{
    CountEntry, EventStatistics, OrganizerCount, SupporterSummary, event_statistics,
};
