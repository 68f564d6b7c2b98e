//! Catalog-Harvester main entry point
//!
//! This is the command-line interface for the Catalog-Harvester product image
//! harvester.

use anyhow::Context;
use catalog_harvester::config::{
    compute_file_hash, load_category_urls, resolve_config, validate_images, Config,
};
use catalog_harvester::crawler::{Harvester, RunOptions};
use catalog_harvester::extractor::LlmExtractor;
use catalog_harvester::images::HttpImageTransport;
use catalog_harvester::state::open_state_store;
use catalog_harvester::ConfigError;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Harvester: a resumable product image harvester
///
/// Reads category page URLs from a list file, discovers the product pages of
/// each category, and downloads every product image that meets the minimum
/// size. Completed categories and products are remembered between runs.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version)]
#[command(about = "A resumable product image harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to harvest.toml if present)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Category URL list file (overrides paths.category-list)
    #[arg(long, value_name = "FILE")]
    categories: Option<PathBuf>,

    /// Output folder for downloaded images (overrides paths.output-dir)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Force reprocessing of already processed items
    #[arg(long)]
    force: bool,

    /// Minimum image size (both width and height) [default: 301]
    #[arg(long, value_name = "N")]
    min_size: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_run_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let category_list = Path::new(&config.paths.category_list);
    let category_urls = match load_category_urls(category_list) {
        Ok(urls) => urls,
        Err(e @ ConfigError::TemplateCreated(_)) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Error reading {}: {}", category_list.display(), e);
            return Err(e.into());
        }
    };

    handle_harvest(config, category_urls, cli.force).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvester=info,warn"),
            1 => EnvFilter::new("catalog_harvester=debug,info"),
            2 => EnvFilter::new("catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves the configuration file and applies command-line overrides
fn load_run_config(cli: &Cli) -> Result<Config, ConfigError> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let mut config = resolve_config(cli.config.as_deref())?;

    if let Some(categories) = &cli.categories {
        config.paths.category_list = categories.display().to_string();
    }
    if let Some(output) = &cli.output {
        config.paths.output_dir = output.display().to_string();
    }
    if let Some(min_size) = cli.min_size {
        config.images.min_size = min_size;
        validate_images(&config.images)?;
    }

    Ok(config)
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: Config,
    category_urls: Vec<String>,
    force: bool,
) -> anyhow::Result<()> {
    let category_list = Path::new(&config.paths.category_list);
    let mut options = RunOptions::from_config(&config, force);
    options.category_list_hash = match compute_file_hash(category_list) {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::warn!("Could not fingerprint {}: {}", category_list.display(), e);
            None
        }
    };

    let extractor = LlmExtractor::from_env(&config.extractor)
        .context("Failed to set up the page extractor")?;
    let transport = HttpImageTransport::new(&config.images, &config.extractor.user_agent)
        .context("Failed to build the image HTTP client")?;
    let store = open_state_store(&config);

    let harvester = Harvester::new(extractor, transport, options);
    let report = match harvester.run(&category_urls, store.as_ref()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    report
        .write_report(Path::new(&config.paths.report_file))
        .with_context(|| format!("Failed to write report to {}", config.paths.report_file))?;

    Ok(())
}
