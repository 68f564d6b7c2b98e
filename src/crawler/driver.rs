//! Run driver - top-level harvest orchestration
//!
//! This module ties a run together:
//! - Loading the resumption state (and resetting it in force mode)
//! - Processing categories in list order with pacing delays
//! - Checkpointing the state after every category
//! - Producing the run report

use crate::config::Config;
use crate::extractor::PageExtractor;
use crate::images::{ImageAcquirer, ImageTransport};
use crate::output::RunReport;
use crate::state::StateStore;
use std::path::PathBuf;
use std::time::Duration;

/// Options that apply to a whole run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root folder for category and product folders
    pub output_dir: PathBuf,
    /// Minimum width and height for an image to be saved
    pub min_size: u32,
    /// Ignore and discard the resumption log
    pub force: bool,
    pub product_delay: Duration,
    pub category_delay: Duration,
    /// Fingerprint of the category list, shown in the report
    pub category_list_hash: Option<String>,
}

impl RunOptions {
    /// Builds run options from the configuration
    pub fn from_config(config: &Config, force: bool) -> Self {
        Self {
            output_dir: PathBuf::from(&config.paths.output_dir),
            min_size: config.images.min_size,
            force,
            product_delay: Duration::from_millis(config.pacing.product_delay_ms),
            category_delay: Duration::from_millis(config.pacing.category_delay_ms),
            category_list_hash: None,
        }
    }
}

/// Walks categories and their products
pub struct Harvester<E, T> {
    pub(super) extractor: E,
    pub(super) acquirer: ImageAcquirer<T>,
    pub(super) options: RunOptions,
}

impl<E: PageExtractor, T: ImageTransport> Harvester<E, T> {
    /// Creates a harvester
    ///
    /// # Arguments
    ///
    /// * `extractor` - Answers questions about category and product pages
    /// * `transport` - Fetches image bytes
    /// * `options` - Run-wide options
    pub fn new(extractor: E, transport: T, options: RunOptions) -> Self {
        Self {
            extractor,
            acquirer: ImageAcquirer::new(transport),
            options,
        }
    }

    /// Runs the harvest over `category_urls`
    ///
    /// Categories are processed strictly in order. The state is saved after
    /// every category; a failed save is logged and retried at the next
    /// checkpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The run finished (individual categories may have aborted)
    /// * `Err(HarvestError)` - The reset state could not be saved in force mode
    pub async fn run(
        &self,
        category_urls: &[String],
        store: &dyn StateStore,
    ) -> crate::Result<RunReport> {
        tracing::info!("Found {} category URLs to process", category_urls.len());
        tracing::info!(
            "Using minimum image size: {}x{} pixels",
            self.options.min_size,
            self.options.min_size
        );

        let mut state = store.load();
        if self.options.force {
            tracing::info!("Force option used - will reprocess all items");
            state.reset();
            store.save(&state)?;
        }

        let mut report = RunReport::new(self.options.min_size, self.options.force);
        if let Some(hash) = &self.options.category_list_hash {
            report = report.with_category_list_hash(hash.clone());
        }

        let total = category_urls.len();
        for (i, category_url) in category_urls.iter().enumerate() {
            tracing::info!("{}", "=".repeat(80));
            tracing::info!("CATEGORY {}/{}: {}", i + 1, total, category_url);
            tracing::info!("{}", "=".repeat(80));

            let outcome = self.process_category(category_url, &mut state).await;
            tracing::info!(
                "Category {} finished as {} with {} products",
                outcome.report.name,
                outcome.stage,
                outcome.report.products_processed
            );
            report.merge_category(outcome);

            match store.save(&state) {
                Ok(()) => tracing::debug!("Saved resumption log to {}", store.location()),
                Err(e) => tracing::warn!(
                    "Failed to save resumption log to {}: {}",
                    store.location(),
                    e
                ),
            }

            if i + 1 < total {
                self.pause(self.options.category_delay).await;
            }
        }

        report.finish();
        report.log_summary();
        tracing::info!(
            "Results saved to {}",
            self.options.output_dir.display()
        );
        tracing::info!("Processed items log: {}", store.location());

        Ok(report)
    }

    pub(super) async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
