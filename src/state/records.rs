use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a fully processed product, keyed by product URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedProductRecord {
    pub name: String,
    pub images_found: u32,
    pub images_downloaded: u32,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedProductRecord {
    /// Creates a record stamped with the current time
    pub fn new(name: impl Into<String>, images_found: u32, images_downloaded: u32) -> Self {
        debug_assert!(images_downloaded <= images_found);
        Self {
            name: name.into(),
            images_found,
            images_downloaded,
            processed_at: Utc::now(),
        }
    }
}

/// Outcome of a fully processed category, keyed by category URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedCategoryRecord {
    pub name: String,
    pub products_processed: u32,
    pub images_downloaded: u32,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedCategoryRecord {
    /// Creates a record stamped with the current time
    pub fn new(name: impl Into<String>, products_processed: u32, images_downloaded: u32) -> Self {
        Self {
            name: name.into(),
            products_processed,
            images_downloaded,
            processed_at: Utc::now(),
        }
    }
}

/// Everything a later run needs to skip completed work
///
/// Records are inserted or replaced whole; they are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumableState {
    #[serde(default)]
    processed_categories: BTreeMap<String, ProcessedCategoryRecord>,
    #[serde(default)]
    processed_products: BTreeMap<String, ProcessedProductRecord>,
}

impl ResumableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_category_done(&self, url: &str) -> bool {
        self.processed_categories.contains_key(url)
    }

    pub fn is_product_done(&self, url: &str) -> bool {
        self.processed_products.contains_key(url)
    }

    pub fn category(&self, url: &str) -> Option<&ProcessedCategoryRecord> {
        self.processed_categories.get(url)
    }

    pub fn product(&self, url: &str) -> Option<&ProcessedProductRecord> {
        self.processed_products.get(url)
    }

    /// Inserts or replaces a category record
    pub fn record_category(&mut self, url: impl Into<String>, record: ProcessedCategoryRecord) {
        self.processed_categories.insert(url.into(), record);
    }

    /// Inserts or replaces a product record
    pub fn record_product(&mut self, url: impl Into<String>, record: ProcessedProductRecord) {
        self.processed_products.insert(url.into(), record);
    }

    /// Discards every record (force mode)
    pub fn reset(&mut self) {
        self.processed_categories.clear();
        self.processed_products.clear();
    }

    pub fn category_count(&self) -> usize {
        self.processed_categories.len()
    }

    pub fn product_count(&self) -> usize {
        self.processed_products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed_categories.is_empty() && self.processed_products.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&String, &ProcessedCategoryRecord)> {
        self.processed_categories.iter()
    }

    pub fn products(&self) -> impl Iterator<Item = (&String, &ProcessedProductRecord)> {
        self.processed_products.iter()
    }
}
