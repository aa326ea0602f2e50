//! Catalog types and the listing contract
//!
//! The catalog is the remote service that knows every dataset and its summary
//! metadata. This module defines the identifier and summary types plus the
//! `Catalog` trait that listing providers implement.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a dataset in the catalog
///
/// Identifiers are opaque to this library; they are only used to address the
/// dataset upstream and to name its cache directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(pub u64);

impl DatasetId {
    /// Directory name for this dataset under the cache root
    pub fn as_dir_name(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DatasetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Summary record for one dataset as returned by the catalog listing
///
/// Counts may be unknown upstream; an unknown count never qualifies a dataset
/// for the columnar encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Dataset identifier
    pub id: DatasetId,
    /// Human-readable dataset name
    pub name: String,
    /// Number of rows, if the catalog knows it
    #[serde(default)]
    pub instance_count: Option<u64>,
    /// Number of columns, if the catalog knows it
    #[serde(default)]
    pub feature_count: Option<u64>,
}

impl DatasetSummary {
    /// Create a summary with known counts
    pub fn new(id: impl Into<DatasetId>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            instance_count: None,
            feature_count: None,
        }
    }

    /// Set the instance count
    pub fn with_instances(mut self, count: u64) -> Self {
        self.instance_count = Some(count);
        self
    }

    /// Set the feature count
    pub fn with_features(mut self, count: u64) -> Self {
        self.feature_count = Some(count);
        self
    }
}

/// Trait for catalog listing providers
///
/// The production implementation is [`crate::client::CatalogClient`]; tests
/// substitute mocks.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List every dataset the catalog knows about, in catalog order
    ///
    /// The returned order is the order the refresh sweep processes datasets
    /// in; implementations must not reorder.
    async fn list_datasets(&self) -> Result<Vec<DatasetSummary>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_display_and_dir_name() {
        let id = DatasetId(1590);
        assert_eq!(id.to_string(), "1590");
        assert_eq!(id.as_dir_name(), "1590");
    }

    #[test]
    fn test_summary_builder() {
        let summary = DatasetSummary::new(31u64, "credit-g")
            .with_instances(1_000)
            .with_features(21);

        assert_eq!(summary.id, DatasetId(31));
        assert_eq!(summary.name, "credit-g");
        assert_eq!(summary.instance_count, Some(1_000));
        assert_eq!(summary.feature_count, Some(21));
    }

    #[test]
    fn test_summary_counts_default_to_unknown() {
        let summary = DatasetSummary::new(7u64, "sparse");
        assert_eq!(summary.instance_count, None);
        assert_eq!(summary.feature_count, None);
    }

    #[test]
    fn test_summary_deserializes_with_missing_counts() {
        let json = r#"{"id": 42, "name": "soybean"}"#;
        let summary: DatasetSummary = serde_json::from_str(json).unwrap();

        assert_eq!(summary.id, DatasetId(42));
        assert_eq!(summary.instance_count, None);
        assert_eq!(summary.feature_count, None);
    }

    #[test]
    fn test_summary_deserializes_with_null_counts() {
        let json = r#"{"id": 42, "name": "soybean", "instance_count": null, "feature_count": 36}"#;
        let summary: DatasetSummary = serde_json::from_str(json).unwrap();

        assert_eq!(summary.instance_count, None);
        assert_eq!(summary.feature_count, Some(36));
    }
}
