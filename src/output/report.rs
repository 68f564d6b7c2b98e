//! Run report aggregation and rendering
//!
//! The report is rebuilt from scratch every run. Processors hand back their
//! outcomes and the driver merges them here in processing order.

use crate::crawler::CategoryOutcome;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// An image that was found but not saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedImage {
    pub url: String,
    pub reason: String,
}

/// Per-product report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReport {
    pub name: String,
    pub url: String,
    pub images_found: u32,
    pub images_downloaded: u32,
    /// Taken from the resumption log instead of processed this run
    pub reused: bool,
}

/// Per-category report entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub name: String,
    pub url: String,
    pub products_processed: u32,
    pub images_downloaded: u32,
    /// Product rows in discovery order (always empty for skipped categories)
    pub products: Vec<ProductReport>,
    /// Recorded by an earlier run and not reprocessed
    pub skipped: bool,
}

impl CategoryReport {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            products_processed: 0,
            images_downloaded: 0,
            products: Vec::new(),
            skipped: false,
        }
    }
}

/// Aggregated results of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub min_size: u32,
    pub force: bool,
    /// SHA-256 of the category list file, if it was read from disk
    pub category_list_hash: Option<String>,

    pub categories: Vec<CategoryReport>,
    pub total_products: u32,
    pub total_images_found: u32,
    pub total_images_downloaded: u32,
    pub total_images_skipped: u32,
    pub failed_images: Vec<FailedImage>,
}

impl RunReport {
    /// Starts an empty report for a run
    pub fn new(min_size: u32, force: bool) -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
            min_size,
            force,
            category_list_hash: None,
            categories: Vec::new(),
            total_products: 0,
            total_images_found: 0,
            total_images_downloaded: 0,
            total_images_skipped: 0,
            failed_images: Vec::new(),
        }
    }

    pub fn with_category_list_hash(mut self, hash: impl Into<String>) -> Self {
        self.category_list_hash = Some(hash.into());
        self
    }

    /// Folds one category's outcome into the run totals
    pub fn merge_category(&mut self, outcome: CategoryOutcome) {
        let CategoryOutcome {
            report,
            images_found,
            images_skipped,
            failures,
            ..
        } = outcome;

        self.total_products += report.products_processed;
        self.total_images_found += images_found;
        self.total_images_downloaded += report.images_downloaded;
        self.total_images_skipped += images_skipped;
        self.failed_images.extend(failures);
        self.categories.push(report);
    }

    /// Stamps the end of the run
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Renders the plain-text report
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        let stamp = self.finished_at.unwrap_or(self.started_at);

        out.push_str(&format!(
            "# SCRAPING REPORT - {}\n\n",
            stamp.format("%Y-%m-%d %H:%M:%S")
        ));

        out.push_str("## RUN INFORMATION\n");
        out.push_str(&format!(
            "- Started: {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S")
        ));
        if let Some(finished) = self.finished_at {
            let seconds = (finished - self.started_at).num_seconds();
            out.push_str(&format!(
                "- Finished: {} ({} seconds)\n",
                finished.format("%Y-%m-%d %H:%M:%S"),
                seconds
            ));
        }
        out.push_str(&format!(
            "- Minimum Image Size: {}x{}\n",
            self.min_size, self.min_size
        ));
        out.push_str(&format!(
            "- Force Reprocess: {}\n",
            if self.force { "yes" } else { "no" }
        ));
        if let Some(hash) = &self.category_list_hash {
            out.push_str(&format!("- Category List Hash: {}\n", hash));
        }
        out.push('\n');

        out.push_str("## SUMMARY\n");
        out.push_str(&format!(
            "- Categories Processed: {}\n",
            self.categories.len()
        ));
        out.push_str(&format!(
            "- Total Products Processed: {}\n",
            self.total_products
        ));
        out.push_str(&format!(
            "- Total Images Found: {}\n",
            self.total_images_found
        ));
        out.push_str(&format!(
            "- Total Images Downloaded: {}\n",
            self.total_images_downloaded
        ));
        out.push_str(&format!(
            "- Total Images Skipped: {}\n\n",
            self.total_images_skipped
        ));

        out.push_str("## CATEGORIES\n");
        for category in &self.categories {
            let marker = if category.skipped {
                " [already processed]"
            } else {
                ""
            };
            out.push_str(&format!(
                "- {} ({}){}\n",
                category.name, category.url, marker
            ));
            out.push_str(&format!("  - Products: {}\n", category.products_processed));
            out.push_str(&format!(
                "  - Images Downloaded: {}\n",
                category.images_downloaded
            ));
        }
        out.push('\n');

        out.push_str("## PRODUCTS\n");
        for category in &self.categories {
            out.push_str(&format!("### {}\n", category.name));
            for product in &category.products {
                out.push_str(&format!("- {} ({})\n", product.name, product.url));
                out.push_str(&format!("  - Images Found: {}\n", product.images_found));
                out.push_str(&format!(
                    "  - Images Downloaded: {}\n",
                    product.images_downloaded
                ));
            }
            out.push('\n');
        }

        if !self.failed_images.is_empty() {
            out.push_str("## FAILED IMAGES\n");
            for failed in &self.failed_images {
                out.push_str(&format!("- {} - {}\n", failed.url, failed.reason));
            }
        }

        out
    }

    /// Writes the rendered report, replacing any previous one
    ///
    /// # Arguments
    ///
    /// * `path` - Destination of the report file
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Report written
    /// * `Err(HarvestError)` - The file could not be created or written
    pub fn write_report(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        file.write_all(self.render_report().as_bytes())?;

        tracing::info!("Report generated: {}", path.display());
        Ok(())
    }

    /// Emits the end-of-run summary through the log
    pub fn log_summary(&self) {
        tracing::info!("{}", "=".repeat(80));
        tracing::info!("SCRAPING COMPLETE");
        tracing::info!("{}", "=".repeat(80));
        tracing::info!("Processed {} categories", self.categories.len());
        tracing::info!("Processed {} products", self.total_products);
        tracing::info!("Found {} images", self.total_images_found);
        tracing::info!("Downloaded {} images", self.total_images_downloaded);
        tracing::info!("Skipped {} images", self.total_images_skipped);
        if !self.failed_images.is_empty() {
            tracing::warn!("{} images could not be saved", self.failed_images.len());
        }
    }
}
