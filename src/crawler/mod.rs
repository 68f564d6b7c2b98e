//! Crawler module for the two-level harvest
//!
//! This module contains the core harvesting logic, including:
//! - The run driver and its options
//! - Category processing (listing extraction and product filtering)
//! - Product processing (name, images, downloads)
//! - The outcome values merged into the run report

mod category;
mod driver;
mod outcome;
mod product;

pub use driver::{Harvester, RunOptions};
pub use outcome::{CategoryOutcome, ProductOutcome};
