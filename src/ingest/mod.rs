//! Ingestion of raw records.
//!
//! Raw events, employees, assignments and holidays arrive with string dates.
//! This module converts them into the typed models, skipping and counting
//! records that cannot be read. Every kind of record can also be imported
//! from CSV.

mod csv_import;
mod dataset;
mod raw;

pub use csv_import::{
    read_assignments, read_assignments_from_path, read_employees, read_employees_from_path,
    read_events, read_events_from_path, read_holidays, read_holidays_from_path,
};
pub use dataset::{Dataset, IngestSummary, RawDataset, RecordCounts};
pub use raw::{RawAssignment, RawEmployee, RawEvent, RawRecord};
