//! Mock implementation of the catalog listing for testing

use async_trait::async_trait;
use datashed_core::catalog::{Catalog, DatasetSummary};
use datashed_core::error::{CatalogError, Error, Result};
use std::sync::Mutex;

/// Mock catalog returning a scripted listing
///
/// The listing is returned in insertion order, matching the real catalog's
/// contract that the sweep processes datasets in listing order.
///
/// # Examples
///
/// ```rust
/// use datashed_test_utils::MockCatalog;
/// use datashed_core::catalog::DatasetSummary;
///
/// let catalog = MockCatalog::new()
///     .with_dataset(DatasetSummary::new(31u64, "credit-g").with_instances(1_000).with_features(21));
/// ```
pub struct MockCatalog {
    summaries: Vec<DatasetSummary>,
    fail_listing: bool,
    list_calls: Mutex<usize>,
}

impl MockCatalog {
    /// Create an empty mock catalog
    pub fn new() -> Self {
        Self {
            summaries: Vec::new(),
            fail_listing: false,
            list_calls: Mutex::new(0),
        }
    }

    /// Append a dataset record to the listing
    pub fn with_dataset(mut self, summary: DatasetSummary) -> Self {
        self.summaries.push(summary);
        self
    }

    /// Configure the listing operation itself to fail
    pub fn with_listing_failure(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Number of times the listing was requested
    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn list_datasets(&self) -> Result<Vec<DatasetSummary>> {
        *self.list_calls.lock().unwrap() += 1;

        if self.fail_listing {
            return Err(Error::Catalog(CatalogError::ConnectionFailed {
                details: "mock listing failure".to_string(),
            }));
        }

        Ok(self.summaries.clone())
    }
}
