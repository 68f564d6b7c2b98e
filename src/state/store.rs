//! Resumption log persistence
//!
//! This module defines the store contract and the default JSON file store.

use crate::state::records::ResumableState;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting the resumption log
#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record for {url}: {message}")]
    Corrupt { url: String, message: String },
}

/// Result type for state store operations
pub type StateResult<T> = Result<T, StateError>;

/// Loads and saves the resumption log
///
/// `load` never fails: a missing or unreadable log is an empty state, which
/// only costs resumption history. `save` must never leave a half-written log
/// behind for a concurrent reader.
pub trait StateStore: Send + Sync {
    /// Reads the persisted state, or an empty one
    fn load(&self) -> ResumableState;

    /// Persists the full state
    fn save(&self, state: &ResumableState) -> StateResult<()>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

/// Resumption log stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn try_load(&self) -> StateResult<ResumableState> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> ResumableState {
        if !self.path.exists() {
            tracing::info!("No resumption log at {}, starting fresh", self.path.display());
            return ResumableState::new();
        }

        match self.try_load() {
            Ok(state) => {
                tracing::info!(
                    "Loaded resumption log: {} categories, {} products",
                    state.category_count(),
                    state.product_count()
                );
                state
            }
            Err(e) => {
                tracing::warn!(
                    "Error loading resumption log {}: {}; starting with empty state",
                    self.path.display(),
                    e
                );
                ResumableState::new()
            }
        }
    }

    fn save(&self, state: &ResumableState) -> StateResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file, then rename over the log
        let temp_path = self.temp_path();
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Saved resumption log to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
