//! SQLite state store
//!
//! This module provides a SQLite-based implementation of the StateStore trait.
//! A connection is opened per load or save so the store itself stays `Send`
//! and cheap to construct.

use crate::state::records::{ProcessedCategoryRecord, ProcessedProductRecord, ResumableState};
use crate::state::schema::initialize_schema;
use crate::state::store::{StateError, StateResult, StateStore};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQLite state backend
#[derive(Debug, Clone)]
pub struct SqliteStateStore {
    path: PathBuf,
}

impl SqliteStateStore {
    /// Creates a store backed by the database at `path`
    ///
    /// The database is created lazily on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> StateResult<Connection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&self.path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        initialize_schema(&conn)?;
        Ok(conn)
    }

    fn try_load(&self) -> StateResult<ResumableState> {
        let conn = self.open()?;
        let mut state = ResumableState::new();

        let mut stmt = conn.prepare(
            "SELECT url, name, products_processed, images_downloaded, processed_at
             FROM processed_categories",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        for row in rows {
            let (url, name, products_processed, images_downloaded, processed_at) = row?;
            let processed_at = parse_timestamp(&url, &processed_at)?;
            state.record_category(
                url,
                ProcessedCategoryRecord {
                    name,
                    products_processed,
                    images_downloaded,
                    processed_at,
                },
            );
        }

        let mut stmt = conn.prepare(
            "SELECT url, name, images_found, images_downloaded, processed_at
             FROM processed_products",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        for row in rows {
            let (url, name, images_found, images_downloaded, processed_at) = row?;
            let processed_at = parse_timestamp(&url, &processed_at)?;
            state.record_product(
                url,
                ProcessedProductRecord {
                    name,
                    images_found,
                    images_downloaded,
                    processed_at,
                },
            );
        }

        Ok(state)
    }
}

fn parse_timestamp(url: &str, value: &str) -> StateResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StateError::Corrupt {
            url: url.to_string(),
            message: format!("bad timestamp '{}': {}", value, e),
        })
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> ResumableState {
        match self.try_load() {
            Ok(state) => {
                tracing::info!(
                    "Loaded resumption database: {} categories, {} products",
                    state.category_count(),
                    state.product_count()
                );
                state
            }
            Err(e) => {
                tracing::warn!(
                    "Error loading resumption database {}: {}; starting with empty state",
                    self.path.display(),
                    e
                );
                ResumableState::new()
            }
        }
    }

    fn save(&self, state: &ResumableState) -> StateResult<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM processed_categories", [])?;
        tx.execute("DELETE FROM processed_products", [])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO processed_categories
                 (url, name, products_processed, images_downloaded, processed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (url, record) in state.categories() {
                stmt.execute(params![
                    url,
                    record.name,
                    record.products_processed,
                    record.images_downloaded,
                    record.processed_at.to_rfc3339(),
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO processed_products
                 (url, name, images_found, images_downloaded, processed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (url, record) in state.products() {
                stmt.execute(params![
                    url,
                    record.name,
                    record.images_found,
                    record.images_downloaded,
                    record.processed_at.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Saved resumption database to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
