//! On-disk cache layout
//!
//! The cache is a flat directory of per-dataset subdirectories under a
//! configured root: `<root>/datasets/<id>/`. Each subdirectory is owned
//! entirely by one dataset and is either absent (cold) or fully populated in
//! the encoding chosen at the last successful refresh. The layout maps
//! identifiers to paths and performs eviction; it never looks inside an
//! entry's files.

use crate::catalog::DatasetId;
use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the cache root that holds per-dataset entries
const DATASETS_DIR_NAME: &str = "datasets";

/// Resolver for per-dataset cache directories under a configured root
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

/// Aggregate statistics over the cache root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of dataset entries present on disk
    pub entry_count: usize,
    /// Total size of all entries in bytes
    pub total_size_bytes: u64,
}

impl CacheLayout {
    /// Create a layout rooted at `root`, creating the datasets directory
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let datasets_dir = root.join(DATASETS_DIR_NAME);
        fs::create_dir_all(&datasets_dir)
            .map_err(|e| IoError::from_std(e).with_path(&datasets_dir))?;

        Ok(Self { root })
    }

    /// The configured cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the cache directory for a dataset identifier
    ///
    /// The path is content-addressed by the identifier; the directory may or
    /// may not exist.
    pub fn dataset_dir(&self, id: DatasetId) -> PathBuf {
        self.root.join(DATASETS_DIR_NAME).join(id.as_dir_name())
    }

    /// Whether a cache entry exists for the dataset
    pub fn is_populated(&self, id: DatasetId) -> bool {
        let dir = self.dataset_dir(id);
        match fs::read_dir(&dir) {
            Ok(mut entries) => entries.next().is_some(),
            Err(_) => false,
        }
    }

    /// Delete the dataset's cache directory tree
    ///
    /// Returns `Ok(true)` if an entry was removed, `Ok(false)` if none
    /// existed. Removal of a live entry must complete before a refresh
    /// writes new contents, so old and new encodings never coexist.
    pub fn evict(&self, id: DatasetId) -> Result<bool> {
        let dir = self.dataset_dir(id);
        if !dir.exists() {
            return Ok(false);
        }

        fs::remove_dir_all(&dir).map_err(|e| IoError::from_std(e).with_path(&dir))?;
        Ok(true)
    }

    /// List the identifiers of all entries present on disk, ascending
    pub fn dataset_ids(&self) -> Result<Vec<DatasetId>> {
        let datasets_dir = self.root.join(DATASETS_DIR_NAME);
        let mut ids = Vec::new();

        for entry in
            fs::read_dir(&datasets_dir).map_err(|e| IoError::from_std(e).with_path(&datasets_dir))?
        {
            let entry = entry.map_err(IoError::from_std)?;
            if !entry.path().is_dir() {
                continue;
            }
            // Non-numeric directories are not cache entries
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<u64>().ok())
            {
                ids.push(DatasetId(id));
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Collect entry count and total size over the whole cache
    pub fn stats(&self) -> Result<CacheStats> {
        let ids = self.dataset_ids()?;
        let mut total_size_bytes = 0;

        for id in &ids {
            total_size_bytes += dir_size(&self.dataset_dir(*id))?;
        }

        Ok(CacheStats {
            entry_count: ids.len(),
            total_size_bytes,
        })
    }

    /// Evict every entry under the cache root
    ///
    /// Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize> {
        let ids = self.dataset_ids()?;
        for id in &ids {
            self.evict(*id)?;
        }
        Ok(ids.len())
    }
}

/// Recursive size of a directory tree in bytes
fn dir_size(dir: &Path) -> Result<u64> {
    let mut size = 0;

    for entry in fs::read_dir(dir).map_err(|e| IoError::from_std(e).with_path(dir))? {
        let entry = entry.map_err(IoError::from_std)?;
        let metadata = entry.metadata().map_err(IoError::from_std)?;

        if metadata.is_dir() {
            size += dir_size(&entry.path())?;
        } else {
            size += metadata.len();
        }
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout_in(temp: &TempDir) -> CacheLayout {
        CacheLayout::new(temp.path()).unwrap()
    }

    #[test]
    fn test_new_creates_datasets_directory() {
        let temp = TempDir::new().unwrap();
        let _layout = layout_in(&temp);

        assert!(temp.path().join("datasets").is_dir());
    }

    #[test]
    fn test_dataset_dir_is_content_addressed() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        let dir = layout.dataset_dir(DatasetId(31));
        assert_eq!(dir, temp.path().join("datasets").join("31"));
    }

    #[test]
    fn test_evict_missing_entry_is_noop() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        let removed = layout.evict(DatasetId(99)).unwrap();
        assert!(!removed);
    }

    #[test]
    fn test_evict_removes_entire_tree() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        let dir = layout.dataset_dir(DatasetId(7));
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("dataset.csv"), b"a,b\n1,2\n").unwrap();
        fs::write(dir.join("nested/extra.json"), b"{}").unwrap();

        let removed = layout.evict(DatasetId(7)).unwrap();
        assert!(removed);
        assert!(!dir.exists());
    }

    #[test]
    fn test_is_populated_requires_contents() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);
        let id = DatasetId(3);

        assert!(!layout.is_populated(id));

        // An empty directory does not count as populated
        fs::create_dir_all(layout.dataset_dir(id)).unwrap();
        assert!(!layout.is_populated(id));

        fs::write(layout.dataset_dir(id).join("dataset.csv"), b"x\n").unwrap();
        assert!(layout.is_populated(id));
    }

    #[test]
    fn test_dataset_ids_sorted_and_skips_foreign_dirs() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        for id in [42u64, 7, 1590] {
            fs::create_dir_all(layout.dataset_dir(DatasetId(id))).unwrap();
        }
        fs::create_dir_all(temp.path().join("datasets/not-a-dataset")).unwrap();

        let ids = layout.dataset_ids().unwrap();
        assert_eq!(ids, vec![DatasetId(7), DatasetId(42), DatasetId(1590)]);
    }

    #[test]
    fn test_stats_counts_entries_and_bytes() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        let dir = layout.dataset_dir(DatasetId(1));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("dataset.csv"), vec![0u8; 128]).unwrap();

        let dir = layout.dataset_dir(DatasetId(2));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("dataset.feather"), vec![0u8; 64]).unwrap();

        let stats = layout.stats().unwrap();
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.total_size_bytes, 192);
    }

    #[test]
    fn test_clear_removes_all_entries() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        for id in 1..=3u64 {
            let dir = layout.dataset_dir(DatasetId(id));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("dataset.csv"), b"x\n").unwrap();
        }

        let removed = layout.clear().unwrap();
        assert_eq!(removed, 3);
        assert!(layout.dataset_ids().unwrap().is_empty());
    }
}
