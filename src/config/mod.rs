//! Configuration loading for the Support-Date Accounting Engine.
//!
//! This module loads the allowance policy from YAML files: policy metadata,
//! the seniority ladder with its exempt tiers, and effective-dated rate tables.
//!
//! # Example
//!
//! ```no_run
//! use support_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/allowance").unwrap();
//! println!("Loaded policy: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowanceConfig, DailyRateEntry, JobTitlesConfig, PolicyMetadata, RateFile, SetupRateEntry,
};
