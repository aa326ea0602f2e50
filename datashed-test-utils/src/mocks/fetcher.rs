//! Mock implementation of the dataset fetcher for testing

use async_trait::async_trait;
use datashed_core::catalog::DatasetId;
use datashed_core::error::{CatalogError, Error, Result};
use datashed_core::fetch::{DatasetFetcher, StorageEncoding};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Configurable behavior for one dataset's fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchBehavior {
    /// Materialize a small description and data file in the requested encoding
    Succeed,
    /// Fail as if the dataset does not exist upstream
    FailNotFound,
    /// Fail as if the catalog is unreachable
    FailConnection,
    /// Fail with a server-side error status
    FailServer(u16),
    /// Write a partial data file into the destination, then fail
    ///
    /// Exercises the refresher's cleanup of partially written entries.
    FailAfterPartialWrite,
}

/// Mock fetcher with per-dataset scripted behavior
///
/// Datasets without an explicit behavior succeed. Every call is recorded in
/// order for assertions on sweep sequencing.
pub struct MockFetcher {
    behaviors: HashMap<DatasetId, FetchBehavior>,
    calls: Mutex<Vec<(DatasetId, StorageEncoding)>>,
}

impl MockFetcher {
    /// Create a mock fetcher where every fetch succeeds
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the behavior for one dataset
    pub fn with_behavior(mut self, id: impl Into<DatasetId>, behavior: FetchBehavior) -> Self {
        self.behaviors.insert(id.into(), behavior);
        self
    }

    /// The recorded `(id, encoding)` pairs, in call order
    pub fn fetch_calls(&self) -> Vec<(DatasetId, StorageEncoding)> {
        self.calls.lock().unwrap().clone()
    }

    fn write_entry(dest: &Path, id: DatasetId, encoding: StorageEncoding) -> Result<()> {
        std::fs::create_dir_all(dest)?;
        std::fs::write(
            dest.join("description.json"),
            format!(r#"{{"id": {id}, "format": "{encoding}"}}"#),
        )?;
        std::fs::write(dest.join(encoding.data_file_name()), b"col_a,col_b\n1,2\n")?;
        Ok(())
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetFetcher for MockFetcher {
    async fn fetch(&self, id: DatasetId, encoding: StorageEncoding, dest: &Path) -> Result<()> {
        self.calls.lock().unwrap().push((id, encoding));

        match self.behaviors.get(&id).copied().unwrap_or(FetchBehavior::Succeed) {
            FetchBehavior::Succeed => Self::write_entry(dest, id, encoding),
            FetchBehavior::FailNotFound => {
                Err(Error::Catalog(CatalogError::dataset_not_found(id.0)))
            }
            FetchBehavior::FailConnection => Err(Error::Catalog(CatalogError::ConnectionFailed {
                details: "mock connection failure".to_string(),
            })),
            FetchBehavior::FailServer(code) => Err(Error::Catalog(CatalogError::server_error(
                code,
                "mock server failure",
            ))),
            FetchBehavior::FailAfterPartialWrite => {
                std::fs::create_dir_all(dest)?;
                std::fs::write(dest.join(encoding.data_file_name()), b"col_a,col_b\n1")?;
                Err(Error::Catalog(CatalogError::ConnectionFailed {
                    details: "mock connection dropped mid-download".to_string(),
                }))
            }
        }
    }
}
