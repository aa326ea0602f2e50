//! Sweep progress abstractions
//!
//! This module provides a trait-based abstraction for sweep progress
//! reporting, allowing the core library to announce per-dataset activity
//! without depending on terminal or UI concerns.

use crate::catalog::DatasetId;
use crate::refresh::RefreshOutcome;

/// Core trait for observing a refresh sweep
///
/// The refresher calls these hooks strictly sequentially, in listing order.
pub trait SweepObserver: Send + Sync {
    /// A sweep over `total` datasets is starting
    fn sweep_started(&self, total: usize);

    /// The dataset is about to be evicted and fetched
    fn dataset_started(&self, id: DatasetId, name: &str);

    /// The dataset's refresh attempt finished with the given outcome
    fn dataset_finished(&self, id: DatasetId, outcome: &RefreshOutcome);

    /// The sweep is complete
    fn sweep_finished(&self);
}

/// Null implementation for when no progress is needed
pub struct NullObserver;

impl SweepObserver for NullObserver {
    fn sweep_started(&self, _total: usize) {
        // No-op: discard all progress updates
    }

    fn dataset_started(&self, _id: DatasetId, _name: &str) {
        // No-op
    }

    fn dataset_finished(&self, _id: DatasetId, _outcome: &RefreshOutcome) {
        // No-op
    }

    fn sweep_finished(&self) {
        // No-op
    }
}
