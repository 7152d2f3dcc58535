//! Configuration types for allowance policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{
    AllowancePolicy, DEFAULT_EXEMPT_TIERS, DEFAULT_JOB_TITLES, DayClass, RateTable, RegionClass,
    SeniorityLadder,
};
use crate::models::EventType;

/// Metadata about the allowance policy.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyMetadata {
    /// Short policy code (e.g., "TRAVEL-2025").
    pub code: String,
    /// The human-readable name of the policy.
    pub name: String,
    /// The version of the policy.
    pub version: String,
    /// Currency the amounts are expressed in.
    pub currency: String,
}

impl Default for PolicyMetadata {
    fn default() -> Self {
        Self {
            code: "BUILTIN".to_string(),
            name: "Built-in travel allowance policy".to_string(),
            version: "builtin".to_string(),
            currency: "KRW".to_string(),
        }
    }
}

/// Job titles configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct JobTitlesConfig {
    /// Job titles, most senior first.
    pub titles: Vec<String>,
    /// How many of the top titles are exempt from allowances.
    #[serde(default = "default_exempt_tiers")]
    pub exempt_tiers: usize,
}

fn default_exempt_tiers() -> usize {
    DEFAULT_EXEMPT_TIERS
}

impl Default for JobTitlesConfig {
    fn default() -> Self {
        Self {
            titles: DEFAULT_JOB_TITLES.iter().map(|t| t.to_string()).collect(),
            exempt_tiers: DEFAULT_EXEMPT_TIERS,
        }
    }
}

/// One daily rate cell.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyRateEntry {
    /// Working day or rest day.
    pub day: DayClass,
    /// Regional or local event.
    pub region: RegionClass,
    /// Event category.
    pub event_type: EventType,
    /// Amount per day.
    pub amount: Decimal,
}

/// One setup-day rate cell.
#[derive(Debug, Clone, Deserialize)]
pub struct SetupRateEntry {
    /// Working day or rest day.
    pub day: DayClass,
    /// Event category.
    pub event_type: EventType,
    /// Amount for the setup day.
    pub amount: Decimal,
}

/// Rate configuration for a specific effective date.
#[derive(Debug, Clone, Deserialize)]
pub struct RateFile {
    /// The effective date for these rates.
    pub effective_date: NaiveDate,
    /// Daily rate cells. Cells not listed pay nothing.
    pub daily: Vec<DailyRateEntry>,
    /// Setup-day rate cells. Cells not listed pay nothing.
    #[serde(default)]
    pub setup: Vec<SetupRateEntry>,
}

impl RateFile {
    /// Builds the rate table described by this file.
    pub fn to_table(&self) -> RateTable {
        let mut table = RateTable::new(self.effective_date);
        for entry in &self.daily {
            table.set_daily(entry.day, entry.region, entry.event_type, entry.amount);
        }
        for entry in &self.setup {
            table.set_setup(entry.day, entry.event_type, entry.amount);
        }
        table
    }
}

/// The complete allowance configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct AllowanceConfig {
    metadata: PolicyMetadata,
    policy: AllowancePolicy,
}

impl AllowanceConfig {
    /// Creates a new AllowanceConfig from its component parts.
    pub fn new(metadata: PolicyMetadata, job_titles: JobTitlesConfig, rates: Vec<RateTable>) -> Self {
        let ladder = SeniorityLadder::new(job_titles.titles, job_titles.exempt_tiers);
        Self {
            metadata,
            policy: AllowancePolicy::new(ladder, rates),
        }
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns the allowance policy.
    pub fn policy(&self) -> &AllowancePolicy {
        &self.policy
    }
}

impl Default for AllowanceConfig {
    fn default() -> Self {
        Self {
            metadata: PolicyMetadata::default(),
            policy: AllowancePolicy::default(),
        }
    }
}
