//! Storage encodings and the dataset download contract
//!
//! A fetched dataset is materialized on disk in one of two encodings. The
//! columnar Feather encoding reads faster for wide row counts with modest
//! column counts; everything else uses the fetch client's standard encoding.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Row count above which a dataset qualifies for the Feather encoding
pub const FEATHER_MIN_INSTANCES: u64 = 100_000;

/// Column count at or above which a dataset no longer qualifies for Feather
pub const FEATHER_MAX_FEATURES: u64 = 10_000;

/// On-disk storage encoding for a cached dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageEncoding {
    /// Columnar Feather format, fast for high row counts with few columns
    Feather,
    /// The fetch client's default general-purpose format
    Standard,
}

impl StorageEncoding {
    /// Choose the encoding for a dataset of the given shape
    ///
    /// Feather is selected only when both counts are known and the dataset
    /// has more than [`FEATHER_MIN_INSTANCES`] rows and fewer than
    /// [`FEATHER_MAX_FEATURES`] columns. Unknown counts select Standard.
    pub fn for_shape(instance_count: Option<u64>, feature_count: Option<u64>) -> Self {
        match (instance_count, feature_count) {
            (Some(instances), Some(features))
                if instances > FEATHER_MIN_INSTANCES && features < FEATHER_MAX_FEATURES =>
            {
                Self::Feather
            }
            _ => Self::Standard,
        }
    }

    /// File name of the data file for this encoding
    pub fn data_file_name(&self) -> &'static str {
        match self {
            Self::Feather => "dataset.feather",
            Self::Standard => "dataset.csv",
        }
    }

    /// Value used for the `encoding` query parameter of the file endpoint
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Feather => "feather",
            Self::Standard => "csv",
        }
    }
}

impl fmt::Display for StorageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feather => write!(f, "feather"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

/// Trait for dataset download providers
///
/// Implementations materialize the dataset description and data file under
/// `dest`, creating the directory if needed. Any failure may leave `dest`
/// partially written; the refresher is responsible for cleaning up.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Download dataset `id` in `encoding` and materialize it under `dest`
    async fn fetch(
        &self,
        id: crate::catalog::DatasetId,
        encoding: StorageEncoding,
        dest: &Path,
    ) -> Result<()>;
}
