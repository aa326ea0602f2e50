//! Datashed Core Library
//!
//! This is the core library for datashed, providing the catalog client,
//! dataset download, on-disk cache layout, and the refresh sweep that keeps
//! the local dataset cache fresh.

pub mod cache;
pub mod catalog;
pub mod client;
pub mod error;
pub mod fetch;
pub mod progress;
pub mod refresh;

// Re-export main types
pub use cache::{CacheLayout, CacheStats};
pub use catalog::{Catalog, DatasetId, DatasetSummary};
pub use client::{CatalogClient, CatalogClientConfig};
pub use error::{Error, Result};
pub use fetch::{DatasetFetcher, FEATHER_MAX_FEATURES, FEATHER_MIN_INSTANCES, StorageEncoding};
pub use progress::{NullObserver, SweepObserver};
pub use refresh::{CacheRefresher, DatasetRefresh, RefreshOutcome, SweepOptions, SweepReport};
