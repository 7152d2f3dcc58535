//! Support-Date Accounting Engine
//!
//! This crate turns per-day support assignments into compact date ranges,
//! classifies full-period versus partial supporters, and computes holiday and
//! weekend travel allowances aggregated per employee and per event.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
