//! SQLite schema for the resumption log

/// SQL schema for the resumption database
pub const SCHEMA_SQL: &str = r#"
-- Categories that completed in an earlier run
CREATE TABLE IF NOT EXISTS processed_categories (
    url TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    products_processed INTEGER NOT NULL DEFAULT 0,
    images_downloaded INTEGER NOT NULL DEFAULT 0,
    processed_at TEXT NOT NULL
);

-- Products that completed in an earlier run
CREATE TABLE IF NOT EXISTS processed_products (
    url TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    images_found INTEGER NOT NULL DEFAULT 0,
    images_downloaded INTEGER NOT NULL DEFAULT 0,
    processed_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
