//! Values returned by the category and product processors

use crate::output::{CategoryReport, FailedImage, ProductReport};
use crate::state::{CategoryStage, ProcessedCategoryRecord, ProcessedProductRecord};

/// What processing one product contributed to the run
#[derive(Debug, Clone)]
pub struct ProductOutcome {
    pub report: ProductReport,
    pub images_skipped: u32,
    pub failures: Vec<FailedImage>,
}

impl ProductOutcome {
    /// Outcome for a product recorded by an earlier run
    pub fn reused(url: &str, record: &ProcessedProductRecord) -> Self {
        Self {
            report: ProductReport {
                name: record.name.clone(),
                url: url.to_string(),
                images_found: record.images_found,
                images_downloaded: record.images_downloaded,
                reused: true,
            },
            images_skipped: 0,
            failures: Vec::new(),
        }
    }
}

/// What processing one category contributed to the run
#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub report: CategoryReport,
    /// Images found across the products listed in `report`
    pub images_found: u32,
    pub images_skipped: u32,
    pub failures: Vec<FailedImage>,
    /// Terminal stage the category reached
    pub stage: CategoryStage,
}

impl CategoryOutcome {
    /// Empty outcome for a category about to be processed
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            report: CategoryReport::new(name, url),
            images_found: 0,
            images_skipped: 0,
            failures: Vec::new(),
            stage: CategoryStage::NotStarted,
        }
    }

    /// Outcome for a category recorded by an earlier run
    ///
    /// Only the stored totals are known; no product rows are synthesized.
    pub fn skipped(url: &str, record: &ProcessedCategoryRecord) -> Self {
        let mut report = CategoryReport::new(record.name.clone(), url);
        report.products_processed = record.products_processed;
        report.images_downloaded = record.images_downloaded;
        report.skipped = true;

        Self {
            report,
            images_found: 0,
            images_skipped: 0,
            failures: Vec::new(),
            stage: CategoryStage::Skipped,
        }
    }

    /// Outcome for a category that gave up before processing any product
    pub fn aborted(name: &str, url: &str) -> Self {
        Self {
            stage: CategoryStage::Aborted,
            ..Self::new(name, url)
        }
    }

    /// Adds a finished product, keeping discovery order
    pub fn push_product(&mut self, product: ProductOutcome) {
        self.report.products_processed += 1;
        self.report.images_downloaded += product.report.images_downloaded;
        self.images_found += product.report.images_found;
        self.images_skipped += product.images_skipped;
        self.failures.extend(product.failures);
        self.report.products.push(product.report);
    }
}
