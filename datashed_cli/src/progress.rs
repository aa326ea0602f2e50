//! Sweep progress rendering for the CLI
//!
//! This module renders per-dataset sweep events as an indicatif progress
//! bar on stderr, or as plain log lines when no terminal is attached.

use colored::*;
use datashed_core::{DatasetId, RefreshOutcome, SweepObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Sweep observer backed by an indicatif progress bar
///
/// All observer hooks are invoked sequentially by the refresher, so the
/// inner mutex is never contended; it exists to satisfy the `&self` hooks.
pub struct SweepProgressBar {
    bar: Mutex<Option<ProgressBar>>,
}

impl SweepProgressBar {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for SweepProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepObserver for SweepProgressBar {
    fn sweep_started(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} datasets | {percent}%",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message("Refreshing cache".bold().to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn dataset_started(&self, id: DatasetId, name: &str) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            bar.set_message(format!(
                "{}: {} (dataset {})",
                "Refreshing".bold(),
                name.cyan(),
                id
            ));
        }
    }

    fn dataset_finished(&self, id: DatasetId, outcome: &RefreshOutcome) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            if let RefreshOutcome::Failed { reason } = outcome {
                bar.println(format!(
                    "{} dataset {}: {}",
                    "✗".red(),
                    id,
                    reason
                ));
            }
            bar.inc(1);
        }
    }

    fn sweep_finished(&self) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_and_clear();
        }
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Format duration as human-readable string
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        let remaining_seconds = seconds % 60;
        if remaining_seconds > 0 {
            format!("{minutes}m {remaining_seconds}s")
        } else {
            format!("{minutes}m")
        }
    } else {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(30), "30s");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(90), "1m 30s");
        assert_eq!(format_duration(3600), "1h");
        assert_eq!(format_duration(3660), "1h 1m");
        assert_eq!(format_duration(7200), "2h");
    }

    #[test]
    fn test_progress_bar_lifecycle() {
        let observer = SweepProgressBar::new();
        observer.sweep_started(3);
        observer.dataset_started(DatasetId(1), "iris");
        observer.dataset_finished(
            DatasetId(1),
            &RefreshOutcome::Failed {
                reason: "boom".to_string(),
            },
        );
        observer.sweep_finished();
    }
}
