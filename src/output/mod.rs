//! Output module for the end-of-run report
//!
//! This module handles:
//! - Aggregating category and product outcomes into run totals
//! - Rendering and writing the plain-text report
//! - Logging the final console summary

mod report;

pub use report::{CategoryReport, FailedImage, ProductReport, RunReport};
