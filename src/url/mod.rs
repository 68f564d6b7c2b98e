//! URL handling module for Catalog-Harvester
//!
//! This module provides reference resolution, category name derivation, and
//! the classifier that decides whether a discovered URL is a product page of a
//! given category.

mod category;
mod classify;
mod normalize;

// Re-export main functions
pub use category::{extract_category_name, CategoryNameStrategy, LISTING_MARKERS};
pub use classify::{
    belongs_to_category, filter_product_urls, LISTING_MARKER, PRODUCT_INDICATORS, PRODUCT_MARKER,
};
pub use normalize::{normalize, promote_protocol_relative};
