//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading allowance
//! policies from YAML files.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::calculation::{AllowancePolicy, RateTable, SeniorityLadder};
use crate::error::{EngineError, EngineResult};

use super::types::{AllowanceConfig, JobTitlesConfig, PolicyMetadata, RateFile};

/// Loads and provides access to allowance configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides the resulting [`AllowancePolicy`].
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/allowance/
/// ├── policy.yaml          # Policy metadata
/// ├── job_titles.yaml      # Seniority ladder and exempt tiers
/// └── rates/
///     └── 2025-01-01.yaml  # Rates effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use support_ledger::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/allowance").unwrap();
/// println!("Loaded policy: {}", loader.metadata().name);
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// assert!(loader.rate_table(date).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AllowanceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/allowance")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The job title list is empty or has fewer titles than exempt tiers
    /// - A rate amount is fractional or negative, or two rate files share an effective date
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PolicyMetadata>(&path.join("policy.yaml"))?;

        let titles_path = path.join("job_titles.yaml");
        let job_titles = Self::load_yaml::<JobTitlesConfig>(&titles_path)?;
        Self::validate_job_titles(&titles_path, &job_titles)?;

        let rates = Self::load_rates(&path.join("rates"))?;

        tracing::info!(
            code = %metadata.code,
            version = %metadata.version,
            rate_tables = rates.len(),
            "Loaded allowance configuration"
        );

        Ok(Self {
            config: AllowanceConfig::new(metadata, job_titles, rates),
        })
    }

    /// A loader holding the built-in policy, for running without files.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_job_titles(path: &Path, config: &JobTitlesConfig) -> EngineResult<()> {
        let message = if config.titles.is_empty() {
            Some("job title list is empty".to_string())
        } else if config.exempt_tiers > config.titles.len() {
            Some(format!(
                "{} exempt tiers but only {} titles",
                config.exempt_tiers,
                config.titles.len()
            ))
        } else {
            None
        };

        match message {
            Some(message) => Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message,
            }),
            None => Ok(()),
        }
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<RateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        if !rates_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rates_dir_str,
            });
        }

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();
        let mut effective_dates = BTreeSet::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "yaml") {
                continue;
            }

            let table = Self::load_yaml::<RateFile>(&path)?.to_table();
            let invalid = |message: String| EngineError::InvalidRateTable {
                path: path.display().to_string(),
                message,
            };

            table.validate().map_err(invalid)?;
            if !effective_dates.insert(table.effective_date()) {
                return Err(invalid(format!(
                    "another rate file is already effective from {}",
                    table.effective_date()
                )));
            }
            tables.push(table);
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the underlying allowance configuration.
    pub fn config(&self) -> &AllowanceConfig {
        &self.config
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        self.config.metadata()
    }

    /// Returns the allowance policy used by the calculators.
    pub fn policy(&self) -> &AllowancePolicy {
        self.config.policy()
    }

    /// Returns the seniority ladder.
    pub fn ladder(&self) -> &SeniorityLadder {
        self.config.policy().ladder()
    }

    /// Gets the rate table in force on a given date.
    ///
    /// The method finds the most recent rate table that is effective
    /// on or before the given date.
    pub fn rate_table(&self, date: NaiveDate) -> Option<&RateTable> {
        self.config.policy().rates_on(date)
    }
}
