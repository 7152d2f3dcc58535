//! Application state for the Support-Date Accounting Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::ingest::Dataset;

use super::memo::ReportMemo;

/// Shared application state.
///
/// Contains the loaded allowance configuration, the dataset reports are
/// computed over, and the memo of finished reports for that dataset.
#[derive(Clone)]
pub struct AppState {
    /// The loaded allowance configuration.
    config: Arc<ConfigLoader>,
    /// The dataset served by the report endpoints.
    dataset: Arc<RwLock<Dataset>>,
    /// Reports computed from `dataset`. Only valid for the current dataset.
    memo: Arc<ReportMemo>,
}

impl AppState {
    /// Creates a new application state with an empty dataset.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_dataset(config, Dataset::default())
    }

    /// Creates a new application state holding `dataset`.
    pub fn with_dataset(config: ConfigLoader, dataset: Dataset) -> Self {
        Self {
            config: Arc::new(config),
            dataset: Arc::new(RwLock::new(dataset)),
            memo: Arc::new(ReportMemo::new()),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the held dataset lock.
    pub fn dataset(&self) -> &RwLock<Dataset> {
        &self.dataset
    }

    /// Returns the report memo.
    pub fn memo(&self) -> &ReportMemo {
        &self.memo
    }

    /// Replaces the held dataset and clears the memo.
    ///
    /// The memo is cleared while the write lock is held, so no reader can
    /// store a report computed from the old dataset afterwards.
    pub async fn replace_dataset(&self, dataset: Dataset) {
        let mut guard = self.dataset.write().await;
        *guard = dataset;
        self.memo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllowanceReport, Period};

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_replace_dataset_clears_memo() {
        let state = AppState::new(ConfigLoader::builtin());
        let period = Period::month(2025, 5).unwrap();
        state
            .memo()
            .get_or_compute(period, || AllowanceReport::empty(period));
        assert_eq!(state.memo().len(), 1);

        state.replace_dataset(Dataset::default()).await;
        assert!(state.memo().is_empty());
    }
}
