//! Error types for the Support-Date Accounting Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! The aggregation itself is tolerant and never fails on bad records; these
//! errors surface from configuration loading, period construction and the
//! normalisation of raw input records.

use thiserror::Error;

/// The main error type for the Support-Date Accounting Engine.
///
/// # Example
///
/// ```
/// use support_ledger::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rate table or seniority ladder parsed but violates a policy rule.
    #[error("Invalid rate table '{path}': {message}")]
    InvalidRateTable {
        /// The file the table came from.
        path: String,
        /// What was wrong with it.
        message: String,
    },

    /// A date string could not be read as a calendar day.
    #[error("Malformed date in '{field}': {value}")]
    MalformedDate {
        /// The record field that held the date.
        field: String,
        /// The offending raw value.
        value: String,
    },

    /// An event record violates the event invariants.
    #[error("Invalid event '{event_id}': {message}")]
    InvalidEvent {
        /// The ID of the invalid event.
        event_id: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// A reporting period whose end precedes its start, or an impossible calendar period.
    #[error("Invalid period: {message}")]
    InvalidPeriod {
        /// A description of the requested period.
        message: String,
    },

    /// A raw record is missing a required identifier.
    #[error("Invalid {kind} record: {message}")]
    InvalidRecord {
        /// The record type (e.g., "employee").
        kind: String,
        /// What was missing or wrong.
        message: String,
    },

    /// A bulk import source could not be read at all.
    #[error("Import failed: {message}")]
    ImportError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
