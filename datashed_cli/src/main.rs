use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;

mod config;
mod orchestrators;
mod progress;
mod terminal;

use crate::config::{ConfigManager, get_config};
use crate::orchestrators::refresh_orchestrator::{
    OutputFormat, RefreshOptions, RefreshOrchestrator,
};
use datashed_core::CacheLayout;

#[derive(Parser)]
#[command(name = "datashed")]
#[command(author, version, about = "Datashed - Dataset catalog cache management", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the local cache entry of every catalogued dataset
    Refresh {
        /// Process at most this many datasets
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show the sweep plan without touching the cache
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormatArg,

        /// Disable progress bar display
        #[arg(long)]
        no_progress: bool,
    },

    /// Inspect or clear the local cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Show cache location, entry count, and total size
    Status {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormatArg,
    },

    /// Remove all cached dataset entries
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., catalog.base_url)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., catalog.timeout_seconds)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("datashed_core", log::LevelFilter::Debug)
            .filter_module("datashed_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match cli.command {
        Commands::Refresh {
            limit,
            dry_run,
            format,
            no_progress,
        } => {
            let config = get_config().context("Failed to load configuration")?;

            let show_progress = !no_progress
                && config.output.progress_enabled
                && terminal::should_show_progress_by_default();

            let options = RefreshOptions {
                limit,
                dry_run,
                format: format.into(),
                show_progress,
            };

            let orchestrator = RefreshOrchestrator::new(&config, options)
                .context("Failed to create refresh orchestrator")?;
            orchestrator.run().await?;
        }
        Commands::Cache { command } => {
            cache_command(command)?;
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn cache_command(command: CacheCommand) -> Result<()> {
    let config = get_config().context("Failed to load configuration")?;
    let cache_root = config.cache.resolve_root();
    let layout = CacheLayout::new(&cache_root)
        .with_context(|| format!("Failed to open cache root at {}", cache_root.display()))?;

    match command {
        CacheCommand::Status { format } => {
            let stats = layout.stats().context("Failed to read cache stats")?;

            match OutputFormat::from(format) {
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "root": layout.root().display().to_string(),
                        "entry_count": stats.entry_count,
                        "total_size_bytes": stats.total_size_bytes,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Human => {
                    println!("{}", "Cache Status".cyan().bold());
                    println!("{}", "============".cyan());
                    println!();
                    println!("Location:     {}", layout.root().display());
                    println!("Entries:      {}", stats.entry_count);
                    println!(
                        "Total size:   {}",
                        progress::format_bytes(stats.total_size_bytes)
                    );
                }
            }
        }
        CacheCommand::Clear => {
            let count = layout.clear().context("Failed to clear cache")?;
            if count > 0 {
                println!(
                    "✓ Removed {} cached dataset entries",
                    count.to_string().green()
                );
            } else {
                println!("Cache is already empty");
            }
        }
    }

    Ok(())
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => match manager.get(&key) {
            Ok(value) => {
                println!("{value}");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Set { key, value } => match manager.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
                eprintln!(
                    "Configuration saved to: {}",
                    manager.get_config_path().display()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::List => match manager.list() {
            Ok(items) => {
                eprintln!("{}", "Configuration:".bold().blue());
                eprintln!("Config file: {}", manager.get_config_path().display());
                eprintln!();

                for (key, value) in items {
                    println!("{} = {}", key.cyan(), value);
                }
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
