//! Catalog-Harvester: a resumable two-level product image harvester
//!
//! This crate walks category (listing) pages, discovers the product pages that
//! belong to each category, extracts a product name and image URLs from every
//! product page, and downloads the images that meet a minimum size. A persisted
//! resumption log lets repeated runs skip work that already completed.

pub mod config;
pub mod crawler;
pub mod extractor;
pub mod images;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Catalog-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Extractor error for {url}: {message}")]
    Extractor { url: String, message: String },

    #[error("Unexpected extractor result for {url}: {shape}")]
    ExtractorShape { url: String, shape: String },

    #[error("State error: {0}")]
    State(#[from] state::StateError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Created template category list at {0}; add category URLs and run again")]
    TemplateCreated(String),

    #[error("No category URLs found in {0}")]
    NoCategories(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

/// Result type alias for Catalog-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Harvester, RunOptions};
pub use extractor::{ExtractorResult, PageExtractor};
pub use images::{AcquireOutcome, ImageAcquirer, ImageTransport};
pub use output::RunReport;
pub use state::{ResumableState, StateStore};
pub use url::{belongs_to_category, extract_category_name, filter_product_urls, normalize};
