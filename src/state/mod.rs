//! State module for resumable harvesting
//!
//! This module tracks what earlier runs already finished.
//!
//! # Components
//!
//! - `ResumableState`: processed categories and products keyed by URL
//! - `StateStore`: loading and saving that state (JSON file or SQLite)
//! - `CategoryStage` / `ProductStage`: transient processing stages for logging

mod records;
mod schema;
mod sqlite;
mod stage;
mod store;

pub use records::{ProcessedCategoryRecord, ProcessedProductRecord, ResumableState};
pub use sqlite::SqliteStateStore;
pub use stage::{CategoryStage, ProductStage};
pub use store::{JsonStateStore, StateError, StateResult, StateStore};

use crate::config::{Config, StateBackend};

/// Builds the state store selected by the configuration
pub fn open_state_store(config: &Config) -> Box<dyn StateStore> {
    let path = &config.paths.state_file;
    match config.state.backend {
        StateBackend::Json => Box::new(JsonStateStore::new(path)),
        StateBackend::Sqlite => Box::new(SqliteStateStore::new(path)),
    }
}
