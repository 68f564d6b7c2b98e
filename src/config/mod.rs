//! Configuration module for Catalog-Harvester
//!
//! This module handles the optional TOML configuration file, its validation,
//! and the plain-text category list that drives a run.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Images go to: {}", config.paths.output_dir);
//! ```

mod categories;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractorConfig, ImagesConfig, PacingConfig, PathsConfig, StateBackend, StateConfig,
};

pub use categories::{load_category_urls, parse_category_list};
pub use parser::{compute_file_hash, load_config, resolve_config, DEFAULT_CONFIG_FILE};
pub use validation::{validate, validate_images};
