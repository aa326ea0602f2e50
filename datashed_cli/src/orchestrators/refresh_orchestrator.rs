//! Refresh command orchestrator
//!
//! This module handles the business logic for the cache refresh sweep,
//! wiring the catalog client, cache layout, and progress rendering together.

use crate::config::AppConfig;
use crate::progress::SweepProgressBar;
use anyhow::{Context, Result};
use colored::*;
use datashed_core::{
    CacheLayout, CacheRefresher, CatalogClient, NullObserver, SweepOptions, SweepReport,
};
use log::debug;
use std::sync::Arc;

/// Output format for refresh results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Refresh command options
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Maximum number of datasets to process
    pub limit: Option<usize>,
    /// Show the sweep plan without touching the cache
    pub dry_run: bool,
    /// Output format
    pub format: OutputFormat,
    /// Show a progress bar during the sweep
    pub show_progress: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            limit: None,
            dry_run: false,
            format: OutputFormat::Human,
            show_progress: false,
        }
    }
}

/// Orchestrator for the refresh command
pub struct RefreshOrchestrator {
    refresher: CacheRefresher,
    options: RefreshOptions,
}

impl RefreshOrchestrator {
    /// Create a new refresh orchestrator from the loaded configuration
    pub fn new(config: &AppConfig, options: RefreshOptions) -> Result<Self> {
        debug!("Creating refresh orchestrator with options: {options:?}");

        let cache_root = config.cache.resolve_root();
        let layout = CacheLayout::new(&cache_root).with_context(|| {
            format!("Failed to initialize cache root at {}", cache_root.display())
        })?;

        let client = Arc::new(
            CatalogClient::new(config.catalog.clone())
                .context("Failed to create catalog client")?,
        );

        let refresher = CacheRefresher::new(client.clone(), client, layout);

        debug!("Refresh orchestrator created successfully");
        Ok(Self { refresher, options })
    }

    /// Run the refresh sweep (or display the plan in dry-run mode)
    pub async fn run(&self) -> Result<()> {
        if self.options.dry_run {
            return self.display_plan().await;
        }

        if self.options.format == OutputFormat::Human {
            println!("{}", "Starting cache refresh sweep...".cyan().bold());
        }

        let sweep_options = SweepOptions {
            limit: self.options.limit,
        };

        let report = if self.options.show_progress {
            let observer = SweepProgressBar::new();
            self.refresher
                .refresh_with(&sweep_options, &observer)
                .await
                .context("Failed to refresh cache")?
        } else {
            self.refresher
                .refresh_with(&sweep_options, &NullObserver)
                .await
                .context("Failed to refresh cache")?
        };

        match self.options.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)?;
                println!("{json}");
            }
            OutputFormat::Human => {
                self.display_report(&report);
            }
        }

        Ok(())
    }

    /// Display the sweep plan without evicting or fetching anything
    async fn display_plan(&self) -> Result<()> {
        let plan = self
            .refresher
            .plan(self.options.limit)
            .await
            .context("Failed to list catalog datasets")?;

        if self.options.format == OutputFormat::Json {
            let entries: Vec<_> = plan
                .iter()
                .map(|(summary, encoding)| {
                    serde_json::json!({
                        "id": summary.id,
                        "name": summary.name,
                        "encoding": encoding,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        println!(
            "{}",
            "DRY RUN MODE - No actual changes will be made".yellow()
        );

        if plan.is_empty() {
            println!("No datasets in the catalog");
            return Ok(());
        }

        println!();
        println!("Datasets that would be refreshed:");
        println!("{}", "─".repeat(60));

        for (i, (summary, encoding)) in plan.iter().enumerate() {
            println!(
                "{}. {} | {} | Encoding: {}",
                i + 1,
                summary.id.to_string().cyan(),
                summary.name,
                encoding.to_string().yellow()
            );
        }

        Ok(())
    }

    /// Display sweep results
    fn display_report(&self, report: &SweepReport) {
        println!();
        println!("{}", "Refresh Complete".green().bold());
        println!("{}", "================".green());
        println!();

        println!(
            "Processed:       {} datasets",
            report.datasets.len().to_string().bold()
        );
        println!(
            "  {} Refreshed:    {}",
            "✓".green(),
            report.refreshed_count()
        );
        println!("  {} Failed:       {}", "✗".red(), report.failed_count());
        println!();
        println!("Time elapsed:    {:.2}s", report.elapsed_seconds());

        if report.refreshed_count() > 0 && report.elapsed_seconds() > 0.0 {
            let rate = report.refreshed_count() as f64 / report.elapsed_seconds();
            println!("Refresh rate:    {rate:.1} datasets/sec");
        }

        if report.failed_count() > 0 {
            println!();
            println!("{}", "Failures:".red().bold());
            for record in report.failures() {
                let reason = match &record.outcome {
                    datashed_core::RefreshOutcome::Failed { reason } => reason.as_str(),
                    _ => continue,
                };
                println!("  {} {} ({}): {}", "✗".red(), record.name, record.id, reason);
            }
        }
    }
}
