//! Cache refresh sweep
//!
//! The refresher brings the local cache for every catalogued dataset into a
//! fresh, fully-populated state. Each dataset is processed strictly in
//! listing order: evict the existing entry, choose a storage encoding from
//! the dataset's shape, then fetch. A failure for one dataset never aborts
//! the sweep; it is recorded in the sweep report and the entry is left cold.

use crate::cache::CacheLayout;
use crate::catalog::{Catalog, DatasetId, DatasetSummary};
use crate::error::Result;
use crate::fetch::{DatasetFetcher, StorageEncoding};
use crate::progress::{NullObserver, SweepObserver};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options for one refresh sweep
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Process at most this many listing records
    pub limit: Option<usize>,
}

/// Outcome of one dataset's refresh attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Entry is populated in the chosen encoding
    Refreshed { encoding: StorageEncoding },
    /// Entry is cold; the formatted failure reason is kept for diagnostics
    Failed { reason: String },
}

impl RefreshOutcome {
    /// Whether the entry ended the attempt populated
    pub fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed { .. })
    }
}

/// Per-dataset record in a sweep report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRefresh {
    /// Dataset identifier
    pub id: DatasetId,
    /// Dataset name from the catalog listing
    pub name: String,
    /// What happened to this dataset's cache entry
    pub outcome: RefreshOutcome,
}

/// Report of one full refresh sweep over the catalog
///
/// The report replaces silent per-dataset failure suppression: the sweep
/// still never aborts on an individual dataset, but every failure is
/// recorded with its reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// When the sweep started
    pub started_at: DateTime<Utc>,
    /// When the sweep finished
    pub finished_at: DateTime<Utc>,
    /// Per-dataset outcomes, in listing order
    pub datasets: Vec<DatasetRefresh>,
}

impl SweepReport {
    /// Number of datasets whose entry is now populated
    pub fn refreshed_count(&self) -> usize {
        self.datasets
            .iter()
            .filter(|d| d.outcome.is_refreshed())
            .count()
    }

    /// Number of datasets whose entry is now cold after a failure
    pub fn failed_count(&self) -> usize {
        self.datasets.len() - self.refreshed_count()
    }

    /// The failed records, in listing order
    pub fn failures(&self) -> impl Iterator<Item = &DatasetRefresh> {
        self.datasets.iter().filter(|d| !d.outcome.is_refreshed())
    }

    /// Wall-clock duration of the sweep in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        (self.finished_at - self.started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Brings the on-disk cache for every known dataset into a fresh state
pub struct CacheRefresher {
    catalog: Arc<dyn Catalog>,
    fetcher: Arc<dyn DatasetFetcher>,
    layout: CacheLayout,
}

impl CacheRefresher {
    /// Create a refresher over the given catalog, fetcher, and cache layout
    pub fn new(
        catalog: Arc<dyn Catalog>,
        fetcher: Arc<dyn DatasetFetcher>,
        layout: CacheLayout,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            layout,
        }
    }

    /// The cache layout this refresher operates on
    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Refresh the cache entry of every dataset in the catalog
    ///
    /// Fails only when the catalog listing itself cannot be obtained.
    /// Per-dataset failures are contained: the affected entry is left cold
    /// and the sweep continues with the next record.
    pub async fn refresh_all(&self) -> Result<SweepReport> {
        self.refresh_with(&SweepOptions::default(), &NullObserver)
            .await
    }

    /// Refresh with explicit options and a progress observer
    pub async fn refresh_with(
        &self,
        options: &SweepOptions,
        observer: &dyn SweepObserver,
    ) -> Result<SweepReport> {
        let started_at = Utc::now();
        let summaries = self.listing(options.limit).await?;

        observer.sweep_started(summaries.len());
        info!("Starting refresh sweep over {} datasets", summaries.len());

        let mut datasets = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            observer.dataset_started(summary.id, &summary.name);
            info!("Refreshing dataset {} ({})", summary.id, summary.name);

            let outcome = self.refresh_one(summary).await;
            if let RefreshOutcome::Failed { reason } = &outcome {
                warn!("Refresh failed for dataset {}: {}", summary.id, reason);
            }

            observer.dataset_finished(summary.id, &outcome);
            datasets.push(DatasetRefresh {
                id: summary.id,
                name: summary.name.clone(),
                outcome,
            });
        }

        observer.sweep_finished();

        Ok(SweepReport {
            started_at,
            finished_at: Utc::now(),
            datasets,
        })
    }

    /// The sweep plan: listing records paired with their chosen encoding
    ///
    /// Used by dry runs; touches neither the filesystem nor the datasets.
    pub async fn plan(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<(DatasetSummary, StorageEncoding)>> {
        let summaries = self.listing(limit).await?;
        Ok(summaries
            .into_iter()
            .map(|s| {
                let encoding = StorageEncoding::for_shape(s.instance_count, s.feature_count);
                (s, encoding)
            })
            .collect())
    }

    async fn listing(&self, limit: Option<usize>) -> Result<Vec<DatasetSummary>> {
        let mut summaries = self.catalog.list_datasets().await?;
        if let Some(limit) = limit {
            summaries.truncate(limit);
        }
        Ok(summaries)
    }

    /// Evict-then-fetch for a single dataset
    ///
    /// Drives the entry through COLD -> EMPTY -> POPULATED on success, or
    /// back to COLD on failure. Eviction happens before the fetch regardless
    /// of whether the fetch later succeeds.
    async fn refresh_one(&self, summary: &DatasetSummary) -> RefreshOutcome {
        let id = summary.id;

        if let Err(e) = self.layout.evict(id) {
            return RefreshOutcome::Failed {
                reason: e.to_string(),
            };
        }

        let encoding = StorageEncoding::for_shape(summary.instance_count, summary.feature_count);
        let dest = self.layout.dataset_dir(id);

        match self.fetcher.fetch(id, encoding, &dest).await {
            Ok(()) => RefreshOutcome::Refreshed { encoding },
            Err(e) => {
                // The fetch may have partially written the entry; remove it
                // so the entry is cold rather than stale.
                if let Err(cleanup) = self.layout.evict(id) {
                    warn!("Failed to clean up entry for dataset {id}: {cleanup}");
                }
                RefreshOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Per-dataset cache entry state, as observable on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// No cache directory exists
    Cold,
    /// Directory exists with contents from the last successful refresh
    Populated,
}

impl CacheRefresher {
    /// Observe the on-disk state of one dataset's entry
    pub fn entry_state(&self, id: DatasetId) -> EntryState {
        if self.layout.is_populated(id) {
            EntryState::Populated
        } else {
            EntryState::Cold
        }
    }
}
